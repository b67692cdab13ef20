// Vault errors

use crate::accounting::{AccountingError, Amount};
use crate::config::ConfigError;
use crate::ledger::LedgerError;
use thiserror::Error;

/// Errors that can occur during vault transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Limit exceeded: requested {requested}, max {max}")]
    LimitExceeded { requested: Amount, max: Amount },

    #[error("Initial deposit too small: requested {requested}, minimum {minimum}")]
    BelowMinimumDeposit { requested: Amount, minimum: Amount },

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Conversion yields zero shares")]
    ZeroShares,

    #[error("Conversion yields zero assets")]
    ZeroAssets,

    #[error("Insufficient allowance: available {available}, required {required}")]
    InsufficientAllowance { available: Amount, required: Amount },

    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: Amount, required: Amount },

    #[error("Insufficient reserve: available {available}, required {required}")]
    InsufficientReserve { available: Amount, required: Amount },

    #[error("Data integrity fault: {0}")]
    DataIntegrityFault(String),

    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("State export/import error: {0}")]
    StateError(String),
}

impl VaultError {
    /// True when the core reserve/supply invariant has already been broken
    pub fn is_integrity_fault(&self) -> bool {
        matches!(self, VaultError::DataIntegrityFault(_))
    }

    /// Pricing error for a transition that yields shares
    pub(crate) fn share_pricing(err: AccountingError) -> Self {
        match err {
            AccountingError::ZeroAmount => VaultError::ZeroAmount,
            AccountingError::ZeroResult { .. } => VaultError::ZeroShares,
            AccountingError::Overflow => VaultError::Overflow,
        }
    }

    /// Pricing error for a transition that yields assets
    pub(crate) fn asset_pricing(err: AccountingError) -> Self {
        match err {
            AccountingError::ZeroAmount => VaultError::ZeroAmount,
            AccountingError::ZeroResult { .. } => VaultError::ZeroAssets,
            AccountingError::Overflow => VaultError::Overflow,
        }
    }
}

impl From<LedgerError> for VaultError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::InsufficientBalance { available, required } => {
                VaultError::InsufficientBalance { available, required }
            }
            LedgerError::InsufficientReserve { available, required } => {
                VaultError::InsufficientReserve { available, required }
            }
            LedgerError::InsufficientAllowance { available, required } => {
                VaultError::InsufficientAllowance { available, required }
            }
            LedgerError::Overflow => VaultError::Overflow,
            LedgerError::Unavailable(reason) => VaultError::LedgerUnavailable(reason),
        }
    }
}
