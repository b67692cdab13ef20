// Withdraw and redeem tests for the vault module

use crate::common::{empty_vault, funded, seeded_vault};
use sharevault::account::AccountId;
use sharevault::config::VaultConfig;
use sharevault::ledger::AssetLedger;
use sharevault::vault::{MemoryVault, VaultError, VaultEvent};

// ============================================================================
// WITHDRAW TESTS
// ============================================================================

#[test]
fn test_withdraw_burns_rounded_up_shares() {
    let (mut vault, seed) = seeded_vault(1_500, 1_200);

    let burned = vault.withdraw(&seed, 150, &seed, &seed).unwrap();

    assert_eq!(burned, 120);
    assert_eq!(vault.total_assets(), 1_350);
    assert_eq!(vault.total_supply(), 1_080);
    assert_eq!(vault.balance_of(&seed), 1_080);
    assert_eq!(vault.asset_ledger().balance_of(&seed), 150);
}

#[test]
fn test_withdraw_rounding_favors_pool() {
    // 1 asset at 1500/1000 is 0.66 shares -> burn 1 full share
    let (mut vault, seed) = seeded_vault(1_500, 1_000);

    let burned = vault.withdraw(&seed, 1, &seed, &seed).unwrap();

    assert_eq!(burned, 1);
    // remaining holders keep at least the old rate
    let pool = vault.pool();
    assert!(pool.reserve() as u128 * 1_000 >= 1_500 * pool.supply() as u128);
}

#[test]
fn test_preview_withdraw_matches() {
    let (mut vault, seed) = seeded_vault(1_777, 1_313);

    for assets in [1u64, 13, 250, 999] {
        let preview = vault.preview_withdraw(assets).unwrap();
        assert_eq!(vault.withdraw(&seed, assets, &seed, &seed).unwrap(), preview);
    }
}

#[test]
fn test_withdraw_to_other_receiver() {
    let (mut vault, seed) = seeded_vault(1_000, 1_000);
    let carol = AccountId::generate();

    vault.withdraw(&seed, 400, &carol, &seed).unwrap();

    assert_eq!(vault.asset_ledger().balance_of(&carol), 400);
    assert_eq!(vault.asset_ledger().balance_of(&seed), 0);
}

#[test]
fn test_withdraw_more_than_owned() {
    let (mut vault, seed) = seeded_vault(1_500, 1_000);
    let bob = funded(&mut vault, 300);
    vault.deposit(&bob, 300, &bob).unwrap();

    // bob's 200 shares are worth exactly 300
    assert_eq!(vault.max_withdraw(&bob), 300);
    let result = vault.withdraw(&bob, 301, &bob, &bob);

    assert_eq!(result, Err(VaultError::LimitExceeded { requested: 301, max: 300 }));
    assert_eq!(vault.balance_of(&bob), 200);
    assert!(vault.max_withdraw(&seed) >= 1_500);
}

#[test]
fn test_withdraw_per_call_limit() {
    let mut vault =
        MemoryVault::in_memory(VaultConfig::new().with_max_withdraw_per_call(100)).unwrap();
    let alice = AccountId::generate();
    vault.asset_ledger_mut().fund(&alice, 1_000).unwrap();
    vault.deposit(&alice, 1_000, &alice).unwrap();

    assert_eq!(vault.max_withdraw(&alice), 100);
    assert_eq!(vault.max_redeem(&alice), 100);
    assert_eq!(
        vault.withdraw(&alice, 101, &alice, &alice),
        Err(VaultError::LimitExceeded { requested: 101, max: 100 })
    );
    vault.withdraw(&alice, 100, &alice, &alice).unwrap();
}

#[test]
fn test_withdraw_zero_rejected() {
    let (mut vault, seed) = seeded_vault(1_000, 1_000);
    assert_eq!(vault.withdraw(&seed, 0, &seed, &seed), Err(VaultError::ZeroAmount));
}

#[test]
fn test_withdraw_from_empty_pool() {
    let mut vault = empty_vault();
    let alice = AccountId::generate();

    assert_eq!(
        vault.withdraw(&alice, 1, &alice, &alice),
        Err(VaultError::LimitExceeded { requested: 1, max: 0 })
    );
}

// ============================================================================
// DELEGATED WITHDRAW TESTS
// ============================================================================

#[test]
fn test_delegated_withdraw_consumes_allowance() {
    let (mut vault, owner) = seeded_vault(1_500, 1_200);
    let spender = AccountId::generate();
    vault.approve(&owner, &spender, 200);

    let burned = vault.withdraw(&spender, 150, &spender, &owner).unwrap();

    assert_eq!(burned, 120);
    assert_eq!(vault.allowance_of(&owner, &spender), 80);
    assert_eq!(vault.asset_ledger().balance_of(&spender), 150);
    assert_eq!(vault.balance_of(&owner), 1_080);
}

#[test]
fn test_delegated_withdraw_without_allowance_changes_nothing() {
    let (mut vault, owner) = seeded_vault(1_500, 1_200);
    let spender = AccountId::generate();
    vault.approve(&owner, &spender, 119);
    let pool_before = vault.pool();
    let custody_before = vault.asset_ledger().custody();
    let events_before = vault.events().len();

    let result = vault.withdraw(&spender, 150, &spender, &owner);

    assert_eq!(
        result,
        Err(VaultError::InsufficientAllowance { available: 119, required: 120 })
    );
    assert_eq!(vault.pool(), pool_before);
    assert_eq!(vault.asset_ledger().custody(), custody_before);
    assert_eq!(vault.balance_of(&owner), 1_200);
    assert_eq!(vault.asset_ledger().balance_of(&spender), 0);
    assert_eq!(vault.allowance_of(&owner, &spender), 119);
    assert_eq!(vault.events().len(), events_before);
}

#[test]
fn test_owner_needs_no_allowance() {
    let (mut vault, owner) = seeded_vault(1_000, 1_000);
    vault.withdraw(&owner, 10, &owner, &owner).unwrap();
    vault.redeem(&owner, 10, &owner, &owner).unwrap();
}

// ============================================================================
// REDEEM TESTS
// ============================================================================

#[test]
fn test_redeem_pays_rounded_down_assets() {
    // 7 shares at 1500/1000 = 10.5 -> 10
    let (mut vault, seed) = seeded_vault(1_500, 1_000);

    let paid = vault.redeem(&seed, 7, &seed, &seed).unwrap();

    assert_eq!(paid, 10);
    assert_eq!(vault.total_assets(), 1_490);
    assert_eq!(vault.total_supply(), 993);
}

#[test]
fn test_redeem_without_shares() {
    let (mut vault, seed) = seeded_vault(1_000, 1_000);
    let bob = AccountId::generate();

    assert_eq!(vault.preview_redeem(0), Err(VaultError::ZeroAmount));
    assert_eq!(
        vault.redeem(&bob, 1, &bob, &bob),
        Err(VaultError::LimitExceeded { requested: 1, max: 0 })
    );
    assert_eq!(vault.balance_of(&seed), 1_000);
}

#[test]
fn test_delegated_redeem() {
    let (mut vault, owner) = seeded_vault(2_000, 1_000);
    let spender = AccountId::generate();
    vault.approve(&owner, &spender, 50);

    let paid = vault.redeem(&spender, 50, &spender, &owner).unwrap();

    assert_eq!(paid, 100);
    assert_eq!(vault.allowance_of(&owner, &spender), 0);
    assert_eq!(
        vault.redeem(&spender, 1, &spender, &owner),
        Err(VaultError::InsufficientAllowance { available: 0, required: 1 })
    );
}

#[test]
fn test_full_exit_empties_pool() {
    let (mut vault, seed) = seeded_vault(1_000, 1_000);

    let all = vault.balance_of(&seed);
    let paid = vault.redeem(&seed, all, &seed, &seed).unwrap();

    assert_eq!(paid, 1_000);
    assert_eq!(vault.total_supply(), 0);
    assert_eq!(vault.total_assets(), 0);
    assert_eq!(vault.asset_ledger().custody(), 0);
}

// ============================================================================
// ROUND TRIP TESTS
// ============================================================================

#[test]
fn test_deposit_then_redeem_is_not_profitable() {
    let (mut vault, _seed) = seeded_vault(1_500, 1_000);
    let bob = funded(&mut vault, 301);

    let shares = vault.deposit(&bob, 301, &bob).unwrap();
    let back = vault.redeem(&bob, shares, &bob, &bob).unwrap();

    assert_eq!(shares, 200);
    assert_eq!(back, 300);
    assert!(back <= 301);
}

#[test]
fn test_deposit_then_max_withdraw_is_not_profitable() {
    let (mut vault, _seed) = seeded_vault(1_777, 1_313);
    let bob = funded(&mut vault, 1_000);

    vault.deposit(&bob, 1_000, &bob).unwrap();
    let max = vault.max_withdraw(&bob);
    vault.withdraw(&bob, max, &bob, &bob).unwrap();

    assert!(vault.asset_ledger().balance_of(&bob) <= 1_000);
}

#[test]
fn test_withdraw_emits_event() {
    let (mut vault, owner) = seeded_vault(1_500, 1_200);
    let spender = AccountId::generate();
    let receiver = AccountId::generate();
    vault.approve(&owner, &spender, 120);

    vault.withdraw(&spender, 150, &receiver, &owner).unwrap();

    assert_eq!(
        vault.events().last().unwrap().event(),
        &VaultEvent::Withdraw {
            caller: spender,
            receiver,
            owner,
            assets: 150,
            shares: 120,
        }
    );
}
