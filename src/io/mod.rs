//! CSV import and export of ledgers.

mod export;
mod import;
pub mod ledger_csv;

pub use export::*;
pub use import::*;
