// Application layer - use cases and orchestration.
// Sessions own a ledger explicitly and write every change through to storage.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
