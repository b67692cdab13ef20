// Vault module - the state machine that owns the reserve/supply pair

mod error;
mod events;
mod machine;
mod state;

pub use error::VaultError;
pub use events::{EventRecord, VaultEvent};
pub use machine::{MemoryVault, Vault};
pub use state::VaultState;
