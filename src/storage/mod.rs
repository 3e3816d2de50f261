mod csv_store;
mod repository;

pub use csv_store::*;
pub use repository::*;

use anyhow::Result;

use crate::domain::Ledger;

/// SQL migration for initial schema
pub const MIGRATION_001_INITIAL: &str = include_str!("migrations/001_initial.sql");

/// Durable home of one identity's ledger.
///
/// `save` always replaces the whole record with the given ledger; there are
/// no partial writes.
#[allow(async_fn_in_trait)]
pub trait LedgerStore {
    /// Load the stored ledger, or an empty one if nothing was stored yet.
    async fn load(&self) -> Result<Ledger>;

    /// Overwrite the stored record with `ledger`.
    async fn save(&self, ledger: &Ledger) -> Result<()>;

    /// Remove the stored record entirely.
    async fn delete(&self) -> Result<()>;

    /// Human-readable location, for logs.
    fn location(&self) -> String;
}

/// The configured backend.
pub enum Store {
    Csv(CsvStore),
    Sqlite(Repository),
}

impl LedgerStore for Store {
    async fn load(&self) -> Result<Ledger> {
        match self {
            Store::Csv(store) => store.load().await,
            Store::Sqlite(store) => store.load().await,
        }
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        match self {
            Store::Csv(store) => store.save(ledger).await,
            Store::Sqlite(store) => store.save(ledger).await,
        }
    }

    async fn delete(&self) -> Result<()> {
        match self {
            Store::Csv(store) => store.delete().await,
            Store::Sqlite(store) => store.delete().await,
        }
    }

    fn location(&self) -> String {
        match self {
            Store::Csv(store) => store.location(),
            Store::Sqlite(store) => store.location(),
        }
    }
}
