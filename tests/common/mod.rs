// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::str::FromStr;

use anyhow::Result;
use fairshare::application::LedgerService;
use fairshare::config::{Backend, Config};
use fairshare::domain::{Cents, Identity};
use fairshare::storage::{CsvStore, LedgerStore, Store};
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Helper to create a CSV-backed test service in a temporary directory
pub async fn test_service() -> Result<(LedgerService<CsvStore>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let store = CsvStore::new(temp_dir.path().join("expenses_test.csv"));
    let service = LedgerService::open(store).await?;
    Ok((service, temp_dir))
}

/// Config rooted in `temp_dir` for the given backend and user
pub fn test_config(temp_dir: &TempDir, backend: Backend, user: &str) -> Config {
    Config {
        data_dir: temp_dir.path().to_path_buf(),
        backend,
        user: user.to_string(),
        verbose: false,
    }
}

/// Open a session the same way the CLI does
pub async fn open_session(config: &Config) -> Result<LedgerService<Store>> {
    let identity: Identity = config.identity()?;
    let store = config.open_store(&identity).await?;
    Ok(LedgerService::open(store).await?)
}

/// Parse "50,30,20" into decimal shares
pub fn shares(raw: &str) -> Vec<Decimal> {
    raw.split(',')
        .map(|s| Decimal::from_str(s.trim()).unwrap())
        .collect()
}

/// Net balances in ledger order
pub fn balances<S: LedgerStore>(service: &LedgerService<S>) -> Vec<Cents> {
    service.balances().into_iter().map(|(_, b)| b).collect()
}

/// Test fixture: the Alice, Bob, Carol group
pub struct StandardGroup;

impl StandardGroup {
    pub async fn create<S: LedgerStore>(service: &mut LedgerService<S>) -> Result<()> {
        service.add_participant("Alice").await?;
        service.add_participant("Bob").await?;
        service.add_participant("Carol").await?;
        Ok(())
    }
}
