use anyhow::{Context, Result};
use clap::ValueEnum;
use std::path::PathBuf;

use crate::domain::Identity;
use crate::storage::{CsvStore, Repository, Store};

/// File name of the shared SQLite database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "fairshare.db";

/// Where ledgers are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Backend {
    /// One `expenses_<user>.csv` file per identity
    #[default]
    Csv,
    /// One SQLite database, one set of rows per identity
    Sqlite,
}

/// Runtime configuration, assembled from command-line flags.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend: Backend,
    pub user: String,
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            backend: Backend::Csv,
            user: "default".into(),
            verbose: false,
        }
    }
}

impl Config {
    pub fn identity(&self) -> Result<Identity> {
        Identity::new(&self.user).context("Invalid --user")
    }

    /// Location of the CSV record for `identity`.
    pub fn csv_path(&self, identity: &Identity) -> PathBuf {
        self.data_dir.join(identity.record_file_name())
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE_NAME)
    }

    /// Build the configured backend for `identity`.
    pub async fn open_store(&self, identity: &Identity) -> Result<Store> {
        match self.backend {
            Backend::Csv => Ok(Store::Csv(CsvStore::new(self.csv_path(identity)))),
            Backend::Sqlite => {
                tokio::fs::create_dir_all(&self.data_dir)
                    .await
                    .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;
                let path = self.database_path();
                let path = path
                    .to_str()
                    .with_context(|| format!("Non UTF-8 database path: {}", path.display()))?;
                Ok(Store::Sqlite(Repository::init(path, identity.key()).await?))
            }
        }
    }
}
