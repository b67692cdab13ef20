// VaultConfig - knobs that shape deposit/withdraw limits

use crate::accounting::Amount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for a single vault
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Display name of the pool
    pub name: String,
    /// Ceiling on the total reserve; `None` means unbounded
    pub deposit_cap: Option<Amount>,
    /// Largest deposit accepted in one call
    pub max_deposit_per_call: Option<Amount>,
    /// Largest withdrawal paid out in one call
    pub max_withdraw_per_call: Option<Amount>,
    /// Smallest deposit accepted while the pool has no shares outstanding
    pub min_initial_deposit: Amount,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            name: "vault".to_string(),
            deposit_cap: None,
            max_deposit_per_call: None,
            max_withdraw_per_call: None,
            min_initial_deposit: 0,
        }
    }
}

impl VaultConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
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

    pub fn with_min_initial_deposit(mut self, min: Amount) -> Self {
        self.min_initial_deposit = min;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name cannot be empty".to_string()));
        }
        if self.max_deposit_per_call == Some(0) {
            return Err(ConfigError::Invalid("max_deposit_per_call cannot be 0".to_string()));
        }
        if self.max_withdraw_per_call == Some(0) {
            return Err(ConfigError::Invalid("max_withdraw_per_call cannot be 0".to_string()));
        }
        if let Some(cap) = self.deposit_cap {
            if self.min_initial_deposit > cap {
                return Err(ConfigError::Invalid(format!(
                    "min_initial_deposit {} exceeds deposit_cap {}",
                    self.min_initial_deposit, cap
                )));
            }
        }
        if let Some(max) = self.max_deposit_per_call {
            if self.min_initial_deposit > max {
                return Err(ConfigError::Invalid(format!(
                    "min_initial_deposit {} exceeds max_deposit_per_call {}",
                    self.min_initial_deposit, max
                )));
            }
        }
        Ok(())
    }
}
