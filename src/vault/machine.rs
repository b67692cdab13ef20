// Vault - deposit/withdraw state machine over the tracked reserve/supply pair

use super::error::VaultError;
use super::events::{EventRecord, VaultEvent};
use crate::account::AccountId;
use crate::accounting::{self, Amount, PoolSnapshot};
use crate::config::VaultConfig;
use crate::ledger::{AssetLedger, LedgerError, MemoryAssetLedger, MemoryShareLedger, ShareLedger};
use crate::policy::{CappedPolicy, Policy};
use tracing::{error, info, warn};

/// Vault backed by the in-memory ledgers with limits taken from its config
pub type MemoryVault = Vault<MemoryAssetLedger, MemoryShareLedger, CappedPolicy>;

/// The pool: tracked reserve and supply plus the ledgers that hold the units
///
/// Pricing always reads the tracked `pool` snapshot, never the raw custody
/// balance, so units pushed into custody outside a transition cannot move
/// the rate until [`Vault::harvest`] recognizes them.
#[derive(Debug)]
pub struct Vault<A, S, P> {
    pub(super) config: VaultConfig,
    pub(super) pool: PoolSnapshot,
    pub(super) assets: A,
    pub(super) shares: S,
    pub(super) policy: P,
    pub(super) events: Vec<EventRecord>,
    pub(super) next_sequence: u64,
}

impl MemoryVault {
    /// Fresh vault on empty in-memory ledgers
    pub fn in_memory(config: VaultConfig) -> Result<Self, VaultError> {
        let policy = CappedPolicy::from_config(&config);
        Vault::new(config, MemoryAssetLedger::new(), MemoryShareLedger::new(), policy)
    }
}

impl<A: AssetLedger, S: ShareLedger, P: Policy> Vault<A, S, P> {
    /// Initialize a pool with zero reserve and zero shares
    ///
    /// Any units already sitting in custody are left unrecognized.
    pub fn new(config: VaultConfig, assets: A, shares: S, policy: P) -> Result<Self, VaultError> {
        config.validate()?;
        let outstanding = shares.total_supply();
        if outstanding != 0 {
            return Err(VaultError::DataIntegrityFault(format!(
                "share ledger already has {} units outstanding",
                outstanding
            )));
        }

        info!(name = %config.name, "vault initialized");
        Ok(Self {
            config,
            pool: PoolSnapshot::empty(),
            assets,
            shares,
            policy,
            events: Vec::new(),
            next_sequence: 1,
        })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    // ========================================================================
    // POOL QUERIES
    // ========================================================================

    /// Tracked reserve/supply pair used for pricing
    pub fn pool(&self) -> PoolSnapshot {
        self.pool
    }

    /// Reserve: base-asset units the pool accounts for
    pub fn total_assets(&self) -> Amount {
        self.pool.reserve()
    }

    /// Outstanding shares
    pub fn total_supply(&self) -> Amount {
        self.pool.supply()
    }

    /// Share balance of `holder`
    pub fn balance_of(&self, holder: &AccountId) -> Amount {
        self.shares.balance_of(holder)
    }

    /// Shares of `owner` that `spender` may still withdraw
    pub fn allowance_of(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.shares.allowance_of(owner, spender)
    }

    /// Let `spender` withdraw up to `shares` of `owner`'s shares
    pub fn approve(&mut self, owner: &AccountId, spender: &AccountId, shares: Amount) {
        self.shares.approve(owner, spender, shares);
    }

    /// Custody units not yet recognized into the reserve
    pub fn unrecognized_surplus(&self) -> Amount {
        self.assets.custody().saturating_sub(self.pool.reserve())
    }

    pub fn asset_ledger(&self) -> &A {
        &self.assets
    }

    /// Direct access to the asset ledger
    ///
    /// Units moved into custody here stay outside the reserve until harvested;
    /// units moved out of custody here trip the integrity check.
    pub fn asset_ledger_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    pub fn share_ledger(&self) -> &S {
        &self.shares
    }

    // ========================================================================
    // CONVERSIONS & PREVIEWS
    // ========================================================================

    /// Floor conversion at the current rate (informational)
    pub fn convert_to_shares(&self, assets: Amount) -> Amount {
        accounting::convert_to_shares(assets, self.pool)
    }

    /// Floor conversion at the current rate (informational)
    pub fn convert_to_assets(&self, shares: Amount) -> Amount {
        accounting::convert_to_assets(shares, self.pool)
    }

    /// Shares `deposit(assets)` would mint right now
    pub fn preview_deposit(&self, assets: Amount) -> Result<Amount, VaultError> {
        accounting::shares_for_deposit(assets, self.pool).map_err(VaultError::share_pricing)
    }

    /// Assets `mint(shares)` would charge right now
    pub fn preview_mint(&self, shares: Amount) -> Result<Amount, VaultError> {
        accounting::assets_for_mint(shares, self.pool).map_err(VaultError::asset_pricing)
    }

    /// Shares `withdraw(assets)` would burn right now (rounded up)
    pub fn preview_withdraw(&self, assets: Amount) -> Result<Amount, VaultError> {
        accounting::shares_to_burn(assets, self.pool).map_err(VaultError::share_pricing)
    }

    /// Assets `redeem(shares)` would pay out right now (rounded down)
    pub fn preview_redeem(&self, shares: Amount) -> Result<Amount, VaultError> {
        accounting::assets_for_withdraw(shares, self.pool).map_err(VaultError::asset_pricing)
    }

    // ========================================================================
    // LIMITS
    // ========================================================================

    pub fn max_deposit(&self, receiver: &AccountId) -> Amount {
        self.policy.max_deposit(receiver, self.pool)
    }

    pub fn max_mint(&self, receiver: &AccountId) -> Amount {
        let max = self.max_deposit(receiver);
        if max == Amount::MAX {
            return Amount::MAX;
        }
        self.convert_to_shares(max)
    }

    /// Policy cap bounded by what `owner`'s shares are worth
    pub fn max_withdraw(&self, owner: &AccountId) -> Amount {
        let owned = self.convert_to_assets(self.shares.balance_of(owner));
        self.policy.max_withdraw(owner, self.pool).min(owned)
    }

    /// Policy cap bounded by `owner`'s share balance
    pub fn max_redeem(&self, owner: &AccountId) -> Amount {
        let balance = self.shares.balance_of(owner);
        let cap = self.policy.max_withdraw(owner, self.pool);
        if cap == Amount::MAX {
            return balance;
        }
        self.convert_to_shares(cap).min(balance)
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Deposit exactly `assets` from `caller`, minting shares to `receiver`
    ///
    /// Returns the shares minted.
    pub fn deposit(
        &mut self,
        caller: &AccountId,
        assets: Amount,
        receiver: &AccountId,
    ) -> Result<Amount, VaultError> {
        let max = self.max_deposit(receiver);
        if assets > max {
            warn!(caller = %caller, assets, max, "deposit over limit");
            return Err(VaultError::LimitExceeded { requested: assets, max });
        }

        let shares = self.preview_deposit(assets).inspect_err(|e| {
            warn!(caller = %caller, assets, error = %e, "deposit rejected at pricing");
        })?;

        self.settle_deposit(caller, receiver, assets, shares)?;
        Ok(shares)
    }

    /// Mint exactly `shares` to `receiver`, charging `caller` the assets
    ///
    /// Returns the assets charged.
    pub fn mint(
        &mut self,
        caller: &AccountId,
        shares: Amount,
        receiver: &AccountId,
    ) -> Result<Amount, VaultError> {
        let assets = self.preview_mint(shares).inspect_err(|e| {
            warn!(caller = %caller, shares, error = %e, "mint rejected at pricing");
        })?;

        let max = self.max_deposit(receiver);
        if assets > max {
            warn!(caller = %caller, assets, max, "mint over limit");
            return Err(VaultError::LimitExceeded { requested: assets, max });
        }

        self.settle_deposit(caller, receiver, assets, shares)?;
        Ok(assets)
    }

    /// Withdraw exactly `assets` to `receiver`, burning `owner`'s shares
    ///
    /// Returns the shares burned.
    pub fn withdraw(
        &mut self,
        caller: &AccountId,
        assets: Amount,
        receiver: &AccountId,
        owner: &AccountId,
    ) -> Result<Amount, VaultError> {
        let max = self.max_withdraw(owner);
        if assets > max {
            warn!(caller = %caller, owner = %owner, assets, max, "withdraw over limit");
            return Err(VaultError::LimitExceeded { requested: assets, max });
        }

        let shares = self.preview_withdraw(assets).inspect_err(|e| {
            warn!(caller = %caller, assets, error = %e, "withdraw rejected at pricing");
        })?;

        self.settle_withdraw(caller, receiver, owner, assets, shares)?;
        Ok(shares)
    }

    /// Redeem exactly `shares` of `owner`, paying assets to `receiver`
    ///
    /// Returns the assets paid out.
    pub fn redeem(
        &mut self,
        caller: &AccountId,
        shares: Amount,
        receiver: &AccountId,
        owner: &AccountId,
    ) -> Result<Amount, VaultError> {
        let max = self.max_redeem(owner);
        if shares > max {
            warn!(caller = %caller, owner = %owner, shares, max, "redeem over limit");
            return Err(VaultError::LimitExceeded { requested: shares, max });
        }

        let assets = self.preview_redeem(shares).inspect_err(|e| {
            warn!(caller = %caller, shares, error = %e, "redeem rejected at pricing");
        })?;

        self.settle_withdraw(caller, receiver, owner, assets, shares)?;
        Ok(assets)
    }

    /// Recognize surplus custody as yield, raising the reserve without minting
    ///
    /// Returns the amount recognized. Nothing is recognized while no shares
    /// are outstanding, otherwise the next depositor would capture it.
    pub fn harvest(&mut self) -> Result<Amount, VaultError> {
        self.check_integrity()?;
        if self.pool.supply() == 0 {
            return Ok(0);
        }

        let surplus = self.unrecognized_surplus();
        if surplus == 0 {
            return Ok(0);
        }

        let reserve = self
            .pool
            .reserve()
            .checked_add(surplus)
            .ok_or(VaultError::Overflow)?;
        self.pool = PoolSnapshot::new(reserve, self.pool.supply());
        self.record(VaultEvent::Harvest { amount: surplus });

        info!(amount = surplus, pool = %self.pool, "surplus harvested");
        Ok(surplus)
    }

    // ========================================================================
    // INTEGRITY
    // ========================================================================

    /// Compare the tracked pair against what the ledgers report
    ///
    /// Custody may exceed the reserve (unharvested surplus) but never fall
    /// below it; ledger supply must match the tracked supply exactly.
    pub fn check_integrity(&self) -> Result<(), VaultError> {
        let custody = self.assets.custody();
        if custody < self.pool.reserve() {
            return Err(self.fault(format!(
                "custody {} below tracked reserve {}",
                custody,
                self.pool.reserve()
            )));
        }

        let supply = self.shares.total_supply();
        if supply != self.pool.supply() {
            return Err(self.fault(format!(
                "ledger supply {} differs from tracked supply {}",
                supply,
                self.pool.supply()
            )));
        }
        Ok(())
    }

    fn fault(&self, detail: String) -> VaultError {
        error!(pool = %self.pool, detail = %detail, "data integrity fault");
        VaultError::DataIntegrityFault(detail)
    }

    // ========================================================================
    // EVENTS
    // ========================================================================

    /// Events recorded since the last drain
    ///
    /// The log is unbounded; long-lived owners must call
    /// [`Vault::drain_events`] (or [`crate::service::VaultHandle::drain_events`])
    /// and archive what they take.
    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    /// Take every recorded event, leaving the log empty
    ///
    /// Sequence numbers keep counting across drains.
    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }

    fn record(&mut self, event: VaultEvent) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(EventRecord::new(sequence, event));
    }

    // ========================================================================
    // SETTLEMENT
    // ========================================================================

    /// transfer-in, then mint; a failed mint refunds the transfer
    fn settle_deposit(
        &mut self,
        caller: &AccountId,
        receiver: &AccountId,
        assets: Amount,
        shares: Amount,
    ) -> Result<(), VaultError> {
        self.check_integrity()?;

        if self.pool.supply() == 0 && assets < self.config.min_initial_deposit {
            return Err(VaultError::BelowMinimumDeposit {
                requested: assets,
                minimum: self.config.min_initial_deposit,
            });
        }

        let next = PoolSnapshot::new(
            self.pool.reserve().checked_add(assets).ok_or(VaultError::Overflow)?,
            self.pool.supply().checked_add(shares).ok_or(VaultError::Overflow)?,
        );

        self.assets.transfer_in(caller, assets).inspect_err(|e| {
            warn!(caller = %caller, assets, error = %e, "deposit transfer-in failed");
        })?;

        if let Err(e) = self.shares.mint(receiver, shares) {
            warn!(receiver = %receiver, shares, error = %e, "mint failed, refunding deposit");
            let refund = self.assets.transfer_out(caller, assets);
            self.compensate(refund, "deposit refund")?;
            return Err(e.into());
        }

        self.commit(next)?;
        self.record(VaultEvent::Deposit {
            caller: *caller,
            receiver: *receiver,
            assets,
            shares,
        });

        info!(caller = %caller, receiver = %receiver, assets, shares, pool = %self.pool, "deposit settled");
        Ok(())
    }

    /// spend allowance, burn, then transfer-out; each failure undoes the earlier steps
    fn settle_withdraw(
        &mut self,
        caller: &AccountId,
        receiver: &AccountId,
        owner: &AccountId,
        assets: Amount,
        shares: Amount,
    ) -> Result<(), VaultError> {
        self.check_integrity()?;

        let reserve = self.pool.reserve();
        if assets > reserve {
            error!(owner = %owner, assets, reserve, "withdraw exceeds tracked reserve");
            return Err(VaultError::InsufficientReserve {
                available: reserve,
                required: assets,
            });
        }
        let held = self.shares.balance_of(owner);
        if shares > held {
            return Err(VaultError::InsufficientBalance {
                available: held,
                required: shares,
            });
        }
        let next = PoolSnapshot::new(
            reserve - assets,
            self.pool.supply().checked_sub(shares).ok_or(VaultError::Overflow)?,
        );

        let delegated = caller != owner;
        let prior_allowance = self.shares.allowance_of(owner, caller);
        if delegated {
            self.shares.spend_allowance(owner, caller, shares).inspect_err(|e| {
                warn!(caller = %caller, owner = %owner, shares, error = %e, "allowance check failed");
            })?;
        }

        if let Err(e) = self.shares.burn(owner, shares) {
            warn!(owner = %owner, shares, error = %e, "burn failed, restoring allowance");
            if delegated {
                self.shares.approve(owner, caller, prior_allowance);
            }
            return Err(e.into());
        }

        if let Err(e) = self.assets.transfer_out(receiver, assets) {
            warn!(receiver = %receiver, assets, error = %e, "transfer-out failed, re-minting shares");
            let remint = self.shares.mint(owner, shares);
            self.compensate(remint, "share re-mint")?;
            if delegated {
                self.shares.approve(owner, caller, prior_allowance);
            }
            return Err(e.into());
        }

        self.commit(next)?;
        self.record(VaultEvent::Withdraw {
            caller: *caller,
            receiver: *receiver,
            owner: *owner,
            assets,
            shares,
        });

        info!(
            caller = %caller,
            receiver = %receiver,
            owner = %owner,
            assets,
            shares,
            pool = %self.pool,
            "withdraw settled"
        );
        Ok(())
    }

    fn compensate(&self, result: Result<(), LedgerError>, step: &str) -> Result<(), VaultError> {
        result.map_err(|e| self.fault(format!("{} failed during rollback: {}", step, e)))
    }

    /// Install the post-transition pair once the ledgers agree with it
    fn commit(&mut self, next: PoolSnapshot) -> Result<(), VaultError> {
        let supply = self.shares.total_supply();
        if supply != next.supply() {
            return Err(self.fault(format!(
                "ledger supply {} after settlement, expected {}",
                supply,
                next.supply()
            )));
        }
        let custody = self.assets.custody();
        if custody < next.reserve() {
            return Err(self.fault(format!(
                "custody {} after settlement below reserve {}",
                custody,
                next.reserve()
            )));
        }
        self.pool = next;
        Ok(())
    }
}
