use rust_decimal::Decimal;
use thiserror::Error;

use super::{Cents, format_cents};

/// Failures raised by the ledger and the settlement engine.
///
/// Every variant is detected before the ledger is touched, so an `Err` always
/// means the ledger is exactly as it was before the call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Participant name is empty or already taken: '{0}'")]
    DuplicateParticipant(String),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("The ledger has no participants")]
    EmptyLedger,

    /// Non-positive payment, or an amount that would push a balance out of range
    #[error(
        "Invalid amount {}: payments must be positive and balances must stay in range",
        format_cents(*.0)
    )]
    InvalidAmount(Cents),

    #[error("Expected {expected} shares (one per participant), got {actual}")]
    ShareMismatch { expected: usize, actual: usize },

    #[error("Shares must be non-negative and add up to exactly 100, got {sum}")]
    ShareSumInvalid { sum: Decimal },
}
