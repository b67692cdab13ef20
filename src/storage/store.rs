// VaultStore - Persistent key-value storage using sled
//
// Provides typed access for storing:
// - The vault state (pool pair, ledgers, config)
// - Archived event records, keyed by sequence

use crate::vault::{EventRecord, VaultError, VaultState};
use std::path::Path;
use thiserror::Error;

/// Key prefixes for organizing data
mod keys {
    pub const VAULT_STATE: &[u8] = b"vault:state";
    pub const EVENT_PREFIX: &[u8] = b"events:";
}

/// Errors from storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    #[error("Database operation failed: {0}")]
    DatabaseError(String),

    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    #[error("Flush failed: {0}")]
    FlushFailed(String),
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::DatabaseError(err.to_string())
    }
}

/// Statistics about the storage
#[derive(Clone, Debug)]
pub struct StorageStats {
    /// Number of keys in the database
    pub key_count: usize,
    /// Number of archived events
    pub archived_events: usize,
    /// Approximate disk size in bytes
    pub disk_size_bytes: u64,
}

/// Persistent store for one vault
///
/// Uses sled for crash-safe, embedded storage.
/// All writes are atomic and durable after flush.
pub struct VaultStore {
    db: sled::Db,
}

impl VaultStore {
    /// Open or create a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = sled::open(path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self { db })
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StoreError> {
        self.db
            .flush()
            .map_err(|e| StoreError::FlushFailed(e.to_string()))?;
        Ok(())
    }

    /// Get storage statistics
    pub fn stats(&self) -> Result<StorageStats, StoreError> {
        Ok(StorageStats {
            key_count: self.db.len(),
            archived_events: self.db.scan_prefix(keys::EVENT_PREFIX).count(),
            disk_size_bytes: self.db.size_on_disk().unwrap_or(0),
        })
    }

    // ========================================================================
    // VAULT STATE
    // ========================================================================

    /// Save the vault state
    pub fn save_state(&self, state: &VaultState) -> Result<(), StoreError> {
        let bytes = state
            .to_bytes()
            .map_err(|e: VaultError| StoreError::SerializationFailed(e.to_string()))?;
        self.db.insert(keys::VAULT_STATE, bytes)?;
        Ok(())
    }

    /// Save the state and append its drained events in one atomic batch
    ///
    /// Either both land or neither does.
    pub fn commit(&self, state: &VaultState, records: &[EventRecord]) -> Result<usize, StoreError> {
        let mut batch = event_batch(records)?;
        let bytes = state
            .to_bytes()
            .map_err(|e: VaultError| StoreError::SerializationFailed(e.to_string()))?;
        batch.insert(keys::VAULT_STATE, bytes);
        self.db.apply_batch(batch)?;
        Ok(records.len())
    }

    /// Load the vault state
    pub fn load_state(&self) -> Result<Option<VaultState>, StoreError> {
        match self.db.get(keys::VAULT_STATE)? {
            Some(bytes) => {
                let state = VaultState::from_bytes(&bytes)
                    .map_err(|e: VaultError| StoreError::DeserializationFailed(e.to_string()))?;
                Ok(Some(state))
            }
            None => Ok(None),
        }
    }

    // ========================================================================
    // EVENT ARCHIVE
    // ========================================================================

    /// Append event records; a record already archived under its sequence is overwritten
    pub fn archive_events(&self, records: &[EventRecord]) -> Result<usize, StoreError> {
        self.db.apply_batch(event_batch(records)?)?;
        Ok(records.len())
    }

    /// Every archived record in sequence order
    pub fn load_events(&self) -> Result<Vec<EventRecord>, StoreError> {
        let mut records = Vec::new();
        for result in self.db.scan_prefix(keys::EVENT_PREFIX) {
            let (_, value) = result?;
            let record: EventRecord = postcard::from_bytes(&value)
                .map_err(|e| StoreError::DeserializationFailed(e.to_string()))?;
            records.push(record);
        }
        Ok(records)
    }
}

fn event_batch(records: &[EventRecord]) -> Result<sled::Batch, StoreError> {
    let mut batch = sled::Batch::default();
    for record in records {
        let bytes = postcard::to_allocvec(record)
            .map_err(|e| StoreError::SerializationFailed(e.to_string()))?;
        batch.insert(event_key(record.sequence()), bytes);
    }
    Ok(batch)
}

/// Big-endian sequence so sled's byte ordering matches sequence order
fn event_key(sequence: u64) -> Vec<u8> {
    [keys::EVENT_PREFIX, &sequence.to_be_bytes()[..]].concat()
}
