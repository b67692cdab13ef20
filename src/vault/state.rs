// Vault state export/import for persistence

use super::error::VaultError;
use super::events::EventRecord;
use super::machine::Vault;
use crate::accounting::PoolSnapshot;
use crate::config::VaultConfig;
use crate::ledger::{MemoryAssetLedger, MemoryShareLedger};
use crate::policy::Policy;
use serde::{Deserialize, Serialize};

/// Everything needed to rebuild an in-memory vault
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultState {
    config: VaultConfig,
    pool: PoolSnapshot,
    assets: MemoryAssetLedger,
    shares: MemoryShareLedger,
    events: Vec<EventRecord>,
    next_sequence: u64,
}

impl VaultState {
    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn pool(&self) -> PoolSnapshot {
        self.pool
    }

    /// Serialize the state to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>, VaultError> {
        postcard::to_allocvec(self).map_err(|e| VaultError::StateError(e.to_string()))
    }

    /// Deserialize a state from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, VaultError> {
        postcard::from_bytes(bytes).map_err(|e| VaultError::StateError(e.to_string()))
    }
}

impl<P: Policy> Vault<MemoryAssetLedger, MemoryShareLedger, P> {
    /// Export vault state for persistence
    pub fn export_state(&self) -> VaultState {
        VaultState {
            config: self.config.clone(),
            pool: self.pool,
            assets: self.assets.clone(),
            shares: self.shares.clone(),
            events: self.events.clone(),
            next_sequence: self.next_sequence,
        }
    }

    /// Rebuild a vault from exported state
    ///
    /// The restored pair must still agree with the restored ledgers.
    pub fn from_state(state: VaultState, policy: P) -> Result<Self, VaultError> {
        state.config.validate()?;
        let vault = Self {
            config: state.config,
            pool: state.pool,
            assets: state.assets,
            shares: state.shares,
            policy,
            events: state.events,
            next_sequence: state.next_sequence,
        };
        vault.check_integrity()?;
        Ok(vault)
    }
}
