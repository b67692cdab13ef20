// VaultHandle - cloneable, lock-serialized front for a vault

use super::alert::{IntegrityAlert, LogAlert};
use crate::account::AccountId;
use crate::accounting::{Amount, PoolSnapshot};
use crate::ledger::{AssetLedger, MemoryAssetLedger, MemoryShareLedger, ShareLedger};
use crate::policy::Policy;
use crate::vault::{EventRecord, Vault, VaultError, VaultState};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Shared handle; every clone drives the same vault
pub struct VaultHandle<A, S, P> {
    vault: Arc<Mutex<Vault<A, S, P>>>,
    alert: Arc<dyn IntegrityAlert>,
}

impl<A, S, P> Clone for VaultHandle<A, S, P> {
    fn clone(&self) -> Self {
        Self {
            vault: Arc::clone(&self.vault),
            alert: Arc::clone(&self.alert),
        }
    }
}

impl<A, S, P> VaultHandle<A, S, P>
where
    A: AssetLedger + Send,
    S: ShareLedger + Send,
    P: Policy + Send,
{
    /// Wrap a vault, alerting through the log
    pub fn new(vault: Vault<A, S, P>) -> Self {
        Self::with_alert(vault, Arc::new(LogAlert))
    }

    pub fn with_alert(vault: Vault<A, S, P>, alert: Arc<dyn IntegrityAlert>) -> Self {
        Self {
            vault: Arc::new(Mutex::new(vault)),
            alert,
        }
    }

    pub async fn deposit(&self, caller: &AccountId, assets: Amount, receiver: &AccountId) -> Result<Amount, VaultError> {
        let result = self.vault.lock().await.deposit(caller, assets, receiver);
        self.escalate(result).await
    }

    pub async fn mint(&self, caller: &AccountId, shares: Amount, receiver: &AccountId) -> Result<Amount, VaultError> {
        let result = self.vault.lock().await.mint(caller, shares, receiver);
        self.escalate(result).await
    }

    pub async fn withdraw(
        &self,
        caller: &AccountId,
        assets: Amount,
        receiver: &AccountId,
        owner: &AccountId,
    ) -> Result<Amount, VaultError> {
        let result = self.vault.lock().await.withdraw(caller, assets, receiver, owner);
        self.escalate(result).await
    }

    pub async fn redeem(
        &self,
        caller: &AccountId,
        shares: Amount,
        receiver: &AccountId,
        owner: &AccountId,
    ) -> Result<Amount, VaultError> {
        let result = self.vault.lock().await.redeem(caller, shares, receiver, owner);
        self.escalate(result).await
    }

    pub async fn harvest(&self) -> Result<Amount, VaultError> {
        let result = self.vault.lock().await.harvest();
        self.escalate(result).await
    }

    pub async fn check_integrity(&self) -> Result<(), VaultError> {
        let result = self.vault.lock().await.check_integrity();
        self.escalate(result).await
    }

    pub async fn approve(&self, owner: &AccountId, spender: &AccountId, shares: Amount) {
        self.vault.lock().await.approve(owner, spender, shares);
    }

    pub async fn preview_deposit(&self, assets: Amount) -> Result<Amount, VaultError> {
        self.vault.lock().await.preview_deposit(assets)
    }

    pub async fn preview_mint(&self, shares: Amount) -> Result<Amount, VaultError> {
        self.vault.lock().await.preview_mint(shares)
    }

    pub async fn preview_withdraw(&self, assets: Amount) -> Result<Amount, VaultError> {
        self.vault.lock().await.preview_withdraw(assets)
    }

    pub async fn preview_redeem(&self, shares: Amount) -> Result<Amount, VaultError> {
        self.vault.lock().await.preview_redeem(shares)
    }

    pub async fn total_assets(&self) -> Amount {
        self.vault.lock().await.total_assets()
    }

    pub async fn total_supply(&self) -> Amount {
        self.vault.lock().await.total_supply()
    }

    pub async fn pool(&self) -> PoolSnapshot {
        self.vault.lock().await.pool()
    }

    pub async fn balance_of(&self, holder: &AccountId) -> Amount {
        self.vault.lock().await.balance_of(holder)
    }

    /// Take the vault's pending events for archiving
    pub async fn drain_events(&self) -> Vec<EventRecord> {
        self.vault.lock().await.drain_events()
    }

    /// Run `f` against the vault while holding the lock
    ///
    /// Anything `f` does to the ledgers happens inside the same critical
    /// section as the transitions.
    pub async fn with_vault<R>(&self, f: impl FnOnce(&mut Vault<A, S, P>) -> R) -> R {
        let mut vault = self.vault.lock().await;
        f(&mut vault)
    }

    async fn escalate<T>(&self, result: Result<T, VaultError>) -> Result<T, VaultError> {
        if let Err(fault) = &result {
            if fault.is_integrity_fault() {
                debug!("escalating integrity fault");
                self.alert.raise(fault).await;
            }
        }
        result
    }
}

impl<P: Policy + Send> VaultHandle<MemoryAssetLedger, MemoryShareLedger, P> {
    pub async fn export_state(&self) -> VaultState {
        self.vault.lock().await.export_state()
    }
}
