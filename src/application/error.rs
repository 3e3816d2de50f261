use thiserror::Error;

use crate::domain::LedgerError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// The ledger failure behind this error, if it is one.
    pub fn ledger_error(&self) -> Option<&LedgerError> {
        match self {
            AppError::Ledger(e) => Some(e),
            AppError::Storage(_) => None,
        }
    }
}
