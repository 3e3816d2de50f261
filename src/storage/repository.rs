use anyhow::{Context, Result};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::domain::{Cents, Ledger};

use super::{LedgerStore, MIGRATION_001_INITIAL};

/// SQLite-backed ledger store. One database holds many ledgers, each keyed by
/// the owning identity.
pub struct Repository {
    pool: SqlitePool,
    ledger_key: String,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool, ledger_key: impl Into<String>) -> Self {
        Self {
            pool,
            ledger_key: ledger_key.into(),
        }
    }

    /// Connect to a SQLite database.
    pub async fn connect(database_url: &str, ledger_key: impl Into<String>) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool, ledger_key))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Open (creating if needed) the database file at `database_path` and
    /// make sure the schema exists.
    pub async fn init(database_path: &str, ledger_key: impl Into<String>) -> Result<Self> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Self::connect(&db_url, ledger_key).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    pub fn ledger_key(&self) -> &str {
        &self.ledger_key
    }
}

impl LedgerStore for Repository {
    async fn load(&self) -> Result<Ledger> {
        let rows = sqlx::query(
            r#"
            SELECT name, amount_cents
            FROM participants
            WHERE ledger = ?
            ORDER BY position
            "#,
        )
        .bind(&self.ledger_key)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load participants")?;

        let entries = rows.iter().map(|row| {
            let name: String = row.get("name");
            let amount: Cents = row.get("amount_cents");
            (name, amount)
        });

        Ledger::from_entries(entries).context("Stored ledger is inconsistent")
    }

    async fn save(&self, ledger: &Ledger) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start transaction")?;

        sqlx::query("DELETE FROM participants WHERE ledger = ?")
            .bind(&self.ledger_key)
            .execute(&mut *tx)
            .await
            .context("Failed to clear participants")?;

        for (position, participant) in ledger.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO participants (ledger, position, name, amount_cents)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(&self.ledger_key)
            .bind(position as i64)
            .bind(&participant.name)
            .bind(participant.net_balance)
            .execute(&mut *tx)
            .await
            .context("Failed to save participant")?;
        }

        tx.commit().await.context("Failed to commit ledger")?;
        debug!(ledger = %self.ledger_key, participants = ledger.len(), "ledger saved");
        Ok(())
    }

    async fn delete(&self) -> Result<()> {
        let result = sqlx::query("DELETE FROM participants WHERE ledger = ?")
            .bind(&self.ledger_key)
            .execute(&self.pool)
            .await
            .context("Failed to delete ledger")?;
        debug!(ledger = %self.ledger_key, rows = result.rows_affected(), "ledger deleted");
        Ok(())
    }

    fn location(&self) -> String {
        format!("sqlite ledger '{}'", self.ledger_key)
    }
}
