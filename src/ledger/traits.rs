// Ledger Traits
// Contracts the vault consumes for moving base assets and share units

use crate::account::AccountId;
use crate::accounting::Amount;
use thiserror::Error;

/// Errors raised by a ledger when it cannot satisfy a move
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient balance: available {available}, required {required}")]
    InsufficientBalance { available: Amount, required: Amount },

    #[error("Insufficient reserve: available {available}, required {required}")]
    InsufficientReserve { available: Amount, required: Amount },

    #[error("Insufficient allowance: available {available}, required {required}")]
    InsufficientAllowance { available: Amount, required: Amount },

    #[error("Balance would overflow")]
    Overflow,

    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

/// Ledger of the base asset, including the pool's custody account
pub trait AssetLedger {
    /// Base-asset units owned by `holder` outside the pool
    fn balance_of(&self, holder: &AccountId) -> Amount;

    /// Base-asset units currently held in pool custody
    fn custody(&self) -> Amount;

    /// Move `amount` from `from` into pool custody
    fn transfer_in(&mut self, from: &AccountId, amount: Amount) -> Result<(), LedgerError>;

    /// Move `amount` out of pool custody to `to`
    fn transfer_out(&mut self, to: &AccountId, amount: Amount) -> Result<(), LedgerError>;
}

/// Ledger of claim tokens (shares) plus delegated spending permissions
pub trait ShareLedger {
    fn total_supply(&self) -> Amount;

    fn balance_of(&self, holder: &AccountId) -> Amount;

    fn mint(&mut self, to: &AccountId, amount: Amount) -> Result<(), LedgerError>;

    fn burn(&mut self, from: &AccountId, amount: Amount) -> Result<(), LedgerError>;

    /// Shares of `owner` that `spender` may still withdraw
    fn allowance_of(&self, owner: &AccountId, spender: &AccountId) -> Amount;

    /// Set the allowance of `spender` on `owner`'s shares (overwrites)
    fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: Amount);

    /// Check-and-decrement the allowance of `spender` on `owner`'s shares
    fn spend_allowance(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError>;
}
