// Vault events - the observable record of every settled transition

use crate::account::AccountId;
use crate::accounting::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEvent {
    /// Assets entered the pool and shares were minted
    Deposit {
        caller: AccountId,
        receiver: AccountId,
        assets: Amount,
        shares: Amount,
    },
    /// Shares were burned and assets left the pool
    Withdraw {
        caller: AccountId,
        receiver: AccountId,
        owner: AccountId,
        assets: Amount,
        shares: Amount,
    },
    /// Surplus custody was recognized into the reserve
    Harvest { amount: Amount },
}

/// A settled event with its position in the log
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    sequence: u64,
    timestamp_ms: i64,
    event: VaultEvent,
}

impl EventRecord {
    pub(crate) fn new(sequence: u64, event: VaultEvent) -> Self {
        Self {
            sequence,
            timestamp_ms: Utc::now().timestamp_millis(),
            event,
        }
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn event(&self) -> &VaultEvent {
        &self.event
    }

    /// Wall-clock time the transition settled
    pub fn occurred_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp_ms).unwrap_or_default()
    }
}
