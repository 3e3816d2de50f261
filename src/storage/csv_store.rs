use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::Ledger;
use crate::io::ledger_csv;

use super::LedgerStore;

const TMP_SUFFIX: &str = "tmp";

/// Ledger stored as a `Participant,Amount` CSV file.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".");
        name.push(TMP_SUFFIX);
        self.path.with_file_name(name)
    }
}

impl LedgerStore for CsvStore {
    async fn load(&self) -> Result<Ledger> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no ledger file yet, starting empty");
                return Ok(Ledger::new());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read {}", self.path.display()));
            }
        };

        ledger_csv::read_ledger(bytes.as_slice())
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let bytes = ledger_csv::ledger_to_bytes(ledger)?;
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!(path = %self.path.display(), participants = ledger.len(), "ledger saved");
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "nothing to delete");
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to delete {}", self.path.display())),
        }
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_empty() -> Result<()> {
        let temp = TempDir::new()?;
        let store = CsvStore::new(temp.path().join("expenses_nobody.csv"));
        assert!(store.load().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_overwrites_and_leaves_no_tmp() -> Result<()> {
        let temp = TempDir::new()?;
        let store = CsvStore::new(temp.path().join("nested").join("expenses_a.csv"));

        let first = Ledger::from_entries(vec![("Alice", 100), ("Bob", 200)])?;
        store.save(&first).await?;
        let second = Ledger::from_entries(vec![("Carol", -50)])?;
        store.save(&second).await?;

        assert_eq!(store.load().await?, second);
        assert!(!store.tmp_path().exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_removes_file_and_tolerates_missing() -> Result<()> {
        let temp = TempDir::new()?;
        let store = CsvStore::new(temp.path().join("expenses_a.csv"));

        store.save(&Ledger::from_entries(vec![("Alice", 1)])?).await?;
        store.delete().await?;
        assert!(!store.path().exists());
        store.delete().await?;
        assert!(store.load().await?.is_empty());
        Ok(())
    }
}
