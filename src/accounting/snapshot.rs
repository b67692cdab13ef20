// PoolSnapshot - the two numbers every conversion is priced from

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base-asset and share quantities are both counted in indivisible units
pub type Amount = u64;

/// Reserve and outstanding share supply observed at one point in time
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    reserve: Amount,
    supply: Amount,
}

impl PoolSnapshot {
    pub fn new(reserve: Amount, supply: Amount) -> Self {
        Self { reserve, supply }
    }

    /// A freshly initialized pool
    pub fn empty() -> Self {
        Self::default()
    }

    /// Base-asset units held by the pool
    pub fn reserve(&self) -> Amount {
        self.reserve
    }

    /// Share units in circulation
    pub fn supply(&self) -> Amount {
        self.supply
    }

    /// True while the rate is undefined and conversions peg 1:1
    pub fn is_bootstrap(&self) -> bool {
        self.supply == 0 || self.reserve == 0
    }

    /// Assets per share multiplied by `scale`, rounded down
    ///
    /// Returns `None` in the bootstrap case.
    pub fn rate_scaled(&self, scale: u64) -> Option<u128> {
        if self.is_bootstrap() {
            return None;
        }
        Some(self.reserve as u128 * scale as u128 / self.supply as u128)
    }
}

impl fmt::Display for PoolSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reserve={} supply={}", self.reserve, self.supply)
    }
}
