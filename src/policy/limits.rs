// Limit policies consulted before every transition

use crate::account::AccountId;
use crate::accounting::{Amount, PoolSnapshot};
use crate::config::VaultConfig;
use serde::{Deserialize, Serialize};

/// Caps on how much may enter or leave the pool in one transition
pub trait Policy {
    /// Largest asset amount `receiver` may deposit right now
    fn max_deposit(&self, receiver: &AccountId, pool: PoolSnapshot) -> Amount;

    /// Largest asset amount that may be withdrawn on behalf of `owner` right now
    fn max_withdraw(&self, owner: &AccountId, pool: PoolSnapshot) -> Amount;
}

/// No limits beyond what the ledgers themselves enforce
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unbounded;

impl Policy for Unbounded {
    fn max_deposit(&self, _receiver: &AccountId, _pool: PoolSnapshot) -> Amount {
        Amount::MAX
    }

    fn max_withdraw(&self, _owner: &AccountId, _pool: PoolSnapshot) -> Amount {
        Amount::MAX
    }
}

/// Total-reserve cap plus per-call ceilings
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CappedPolicy {
    deposit_cap: Option<Amount>,
    max_deposit_per_call: Option<Amount>,
    max_withdraw_per_call: Option<Amount>,
}

impl CappedPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &VaultConfig) -> Self {
        Self {
            deposit_cap: config.deposit_cap,
            max_deposit_per_call: config.max_deposit_per_call,
            max_withdraw_per_call: config.max_withdraw_per_call,
        }
    }

    pub fn with_deposit_cap(mut self, cap: Amount) -> Self {
        self.deposit_cap = Some(cap);
        self
    }

    pub fn with_max_deposit_per_call(mut self, max: Amount) -> Self {
        self.max_deposit_per_call = Some(max);
        self
    }

    pub fn with_max_withdraw_per_call(mut self, max: Amount) -> Self {
        self.max_withdraw_per_call = Some(max);
        self
    }
}

impl Policy for CappedPolicy {
    fn max_deposit(&self, _receiver: &AccountId, pool: PoolSnapshot) -> Amount {
        let headroom = self
            .deposit_cap
            .map(|cap| cap.saturating_sub(pool.reserve()))
            .unwrap_or(Amount::MAX);
        headroom.min(self.max_deposit_per_call.unwrap_or(Amount::MAX))
    }

    fn max_withdraw(&self, _owner: &AccountId, _pool: PoolSnapshot) -> Amount {
        self.max_withdraw_per_call.unwrap_or(Amount::MAX)
    }
}
