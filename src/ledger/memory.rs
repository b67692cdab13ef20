// In-memory ledgers
// Used by the CLI (persisted through the store) and by tests

use super::traits::{AssetLedger, LedgerError, ShareLedger};
use crate::account::AccountId;
use crate::accounting::Amount;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// ASSET LEDGER
// ============================================================================

/// Base-asset balances plus the pool custody account
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryAssetLedger {
    balances: HashMap<AccountId, Amount>,
    custody: Amount,
}

impl MemoryAssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `holder` with freshly issued base-asset units
    pub fn fund(&mut self, holder: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let balance = self.balances.entry(*holder).or_insert(0);
        *balance = balance.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Push units straight into custody, bypassing the vault
    ///
    /// This is how externally accrued yield (and donations) arrive.
    pub fn inject(&mut self, amount: Amount) -> Result<(), LedgerError> {
        self.custody = self.custody.checked_add(amount).ok_or(LedgerError::Overflow)?;
        Ok(())
    }

    /// Pull units straight out of custody, bypassing the vault
    pub fn drain(&mut self, amount: Amount) -> Result<(), LedgerError> {
        if amount > self.custody {
            return Err(LedgerError::InsufficientReserve {
                available: self.custody,
                required: amount,
            });
        }
        self.custody -= amount;
        Ok(())
    }

    /// Sum of every holder balance plus custody
    pub fn total_issued(&self) -> u128 {
        self.balances.values().map(|b| *b as u128).sum::<u128>() + self.custody as u128
    }
}

impl AssetLedger for MemoryAssetLedger {
    fn balance_of(&self, holder: &AccountId) -> Amount {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn custody(&self) -> Amount {
        self.custody
    }

    fn transfer_in(&mut self, from: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        let custody = self.custody.checked_add(amount).ok_or(LedgerError::Overflow)?;
        self.balances.insert(*from, available - amount);
        self.custody = custody;
        Ok(())
    }

    fn transfer_out(&mut self, to: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        if amount > self.custody {
            return Err(LedgerError::InsufficientReserve {
                available: self.custody,
                required: amount,
            });
        }
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.custody -= amount;
        self.balances.insert(*to, balance);
        Ok(())
    }
}

// ============================================================================
// SHARE LEDGER
// ============================================================================

/// Share balances, total supply and allowances
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryShareLedger {
    balances: HashMap<AccountId, Amount>,
    allowances: HashMap<(AccountId, AccountId), Amount>,
    total_supply: Amount,
}

impl MemoryShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move shares between holders; supply is unchanged
    pub fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.set_balance(from, available - amount);
        self.set_balance(to, credited);
        Ok(())
    }

    /// Holders with a non-zero balance
    pub fn holders(&self) -> Vec<(AccountId, Amount)> {
        let mut holders: Vec<_> = self.balances.iter().map(|(id, b)| (*id, *b)).collect();
        holders.sort();
        holders
    }

    /// Sum of every holder balance; equals `total_supply` unless the ledger is corrupt
    pub fn sum_of_balances(&self) -> u128 {
        self.balances.values().map(|b| *b as u128).sum()
    }

    fn set_balance(&mut self, holder: &AccountId, amount: Amount) {
        if amount == 0 {
            self.balances.remove(holder);
        } else {
            self.balances.insert(*holder, amount);
        }
    }
}

impl ShareLedger for MemoryShareLedger {
    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn balance_of(&self, holder: &AccountId) -> Amount {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn mint(&mut self, to: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let supply = self.total_supply.checked_add(amount).ok_or(LedgerError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::Overflow)?;
        self.total_supply = supply;
        self.set_balance(to, balance);
        Ok(())
    }

    fn burn(&mut self, from: &AccountId, amount: Amount) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        if amount > available {
            return Err(LedgerError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        let supply = self.total_supply.checked_sub(amount).ok_or(LedgerError::Overflow)?;
        self.set_balance(from, available - amount);
        self.total_supply = supply;
        Ok(())
    }

    fn allowance_of(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    fn approve(&mut self, owner: &AccountId, spender: &AccountId, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(*owner, *spender));
        } else {
            self.allowances.insert((*owner, *spender), amount);
        }
    }

    fn spend_allowance(
        &mut self,
        owner: &AccountId,
        spender: &AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        let available = self.allowance_of(owner, spender);
        if amount > available {
            return Err(LedgerError::InsufficientAllowance {
                available,
                required: amount,
            });
        }
        self.approve(owner, spender, available - amount);
        Ok(())
    }
}
