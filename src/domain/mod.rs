mod error;
mod identity;
mod ledger;
mod money;
mod settlement;
mod split;

pub use error::*;
pub use identity::*;
pub use ledger::*;
pub use money::*;
pub use settlement::*;
pub use split::*;
