// State export/import tests

use crate::common::{funded, seeded_vault, TestVault};
use sharevault::accounting::PoolSnapshot;
use sharevault::ledger::AssetLedger;
use sharevault::policy::{CappedPolicy, Unbounded};
use sharevault::vault::{Vault, VaultError, VaultEvent, VaultState};

#[test]
fn test_state_round_trip_preserves_pool_and_balances() {
    let (mut vault, seed) = seeded_vault(1_500, 1_000);
    let bob = funded(&mut vault, 300);
    vault.deposit(&bob, 300, &bob).unwrap();
    vault.asset_ledger_mut().inject(77).unwrap();

    let bytes = vault.export_state().to_bytes().unwrap();
    let state = VaultState::from_bytes(&bytes).unwrap();
    let restored: TestVault = Vault::from_state(state, Unbounded).unwrap();

    assert_eq!(restored.pool(), vault.pool());
    assert_eq!(restored.balance_of(&seed), vault.balance_of(&seed));
    assert_eq!(restored.balance_of(&bob), 200);
    assert_eq!(restored.unrecognized_surplus(), 77);
    assert_eq!(restored.events(), vault.events());
}

#[test]
fn test_restored_vault_continues_event_sequence() {
    let (mut vault, seed) = seeded_vault(1_000, 1_000);
    let last = vault.events().last().unwrap().sequence();

    let mut restored: TestVault = Vault::from_state(vault.export_state(), Unbounded).unwrap();
    assert_eq!(restored.asset_ledger().balance_of(&seed), 0);

    restored.asset_ledger_mut().inject(10).unwrap();
    restored.harvest().unwrap();

    let record = restored.events().last().unwrap();
    assert_eq!(record.sequence(), last + 1);
    assert_eq!(record.event(), &VaultEvent::Harvest { amount: 10 });

    vault.drain_events();
    assert!(vault.events().is_empty());
}

#[test]
fn test_state_exposes_config_and_pool() {
    let (vault, _seed) = seeded_vault(2_000, 1_000);
    let state = vault.export_state();

    assert_eq!(state.config(), vault.config());
    assert_eq!(state.pool(), PoolSnapshot::new(2_000, 1_000));
}

#[test]
fn test_restore_with_different_policy() {
    let (vault, seed) = seeded_vault(1_000, 1_000);
    let policy = CappedPolicy::new().with_max_withdraw_per_call(100);

    let restored = Vault::from_state(vault.export_state(), policy).unwrap();

    assert_eq!(restored.max_withdraw(&seed), 100);
}

#[test]
fn test_restore_rejects_drained_custody() {
    let (mut vault, _seed) = seeded_vault(1_000, 1_000);
    vault.asset_ledger_mut().drain(500).unwrap();

    let result: Result<TestVault, _> = Vault::from_state(vault.export_state(), Unbounded);

    assert!(matches!(result, Err(VaultError::DataIntegrityFault(_))));
}

#[test]
fn test_garbage_bytes_rejected() {
    let result = VaultState::from_bytes(&[0xff, 0xff, 0xff]);

    assert!(matches!(result, Err(VaultError::StateError(_))));
}
