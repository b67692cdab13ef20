// Storage module - PERSISTENCE
// Handles persistent vault state using sled

mod store;

pub use store::{StorageStats, StoreError, VaultStore};
