// Ledger module - balance-moving collaborators
// The vault prices transitions; these ledgers move the units

mod memory;
mod traits;

pub use memory::{MemoryAssetLedger, MemoryShareLedger};
pub use traits::{AssetLedger, LedgerError, ShareLedger};
