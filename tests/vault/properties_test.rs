// Randomized operation sequences checked against the pool invariants

use crate::common::{empty_vault, funded, seeded_vault, TestVault};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sharevault::account::AccountId;
use sharevault::accounting::PoolSnapshot;
use sharevault::ledger::{AssetLedger, ShareLedger};
use sharevault::vault::VaultError;

/// reserve/supply never falls, compared by cross-multiplication
fn rate_not_lower(before: PoolSnapshot, after: PoolSnapshot) -> bool {
    if before.supply() == 0 || after.supply() == 0 {
        return true;
    }
    after.reserve() as u128 * before.supply() as u128
        >= before.reserve() as u128 * after.supply() as u128
}

fn assert_invariants(vault: &TestVault) {
    let pool = vault.pool();
    assert_eq!(vault.share_ledger().sum_of_balances(), pool.supply() as u128);
    assert_eq!(vault.share_ledger().total_supply(), pool.supply());
    assert!(vault.asset_ledger().custody() >= pool.reserve());
    vault.check_integrity().unwrap();
}

fn run_sequence(seed: u64, steps: usize) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut vault = empty_vault();
    let accounts: Vec<AccountId> = (0..4).map(|_| funded(&mut vault, 10_000_000)).collect();

    for _ in 0..steps {
        let before = vault.pool();
        let who = accounts[rng.gen_range(0..accounts.len())];
        let amount = rng.gen_range(1..=50_000u64);

        let result = match rng.gen_range(0..6) {
            0 => vault.deposit(&who, amount, &who).map(|_| ()),
            1 => vault.mint(&who, amount, &who).map(|_| ()),
            2 => {
                let assets = amount.min(vault.max_withdraw(&who));
                vault.withdraw(&who, assets, &who, &who).map(|_| ())
            }
            3 => {
                let shares = amount.min(vault.max_redeem(&who));
                vault.redeem(&who, shares, &who, &who).map(|_| ())
            }
            4 => {
                vault.asset_ledger_mut().inject(amount / 10).unwrap();
                vault.harvest().map(|_| ())
            }
            _ => vault.asset_ledger_mut().inject(amount).map_err(VaultError::from),
        };

        if let Err(e) = result {
            assert!(!e.is_integrity_fault(), "seed {}: {}", seed, e);
            assert_eq!(vault.pool(), before, "seed {}: failed call moved the pool", seed);
        }

        assert_invariants(&vault);
        assert!(
            rate_not_lower(before, vault.pool()),
            "seed {}: rate fell from {} to {}",
            seed,
            before,
            vault.pool()
        );
    }
}

#[test]
fn test_random_sequences_hold_invariants() {
    for seed in 0..20 {
        run_sequence(seed, 300);
    }
}

#[test]
fn test_deposit_then_redeem_never_profits() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let supply = rng.gen_range(1..=1_000_000u64);
        let reserve = supply + rng.gen_range(0..=3_000_000u64);
        let (mut vault, _seed) = seeded_vault(reserve, supply);
        let assets = rng.gen_range(1..=100_000u64);
        let user = funded(&mut vault, assets);

        let minted = match vault.deposit(&user, assets, &user) {
            Ok(shares) => shares,
            Err(_) => continue,
        };
        let paid = vault.redeem(&user, minted, &user, &user).unwrap_or(0);

        assert!(paid <= assets, "deposit {} returned {}", assets, paid);
    }
}

#[test]
fn test_mint_then_withdraw_never_profits() {
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..200 {
        let supply = rng.gen_range(1..=1_000_000u64);
        let reserve = supply + rng.gen_range(0..=3_000_000u64);
        let (mut vault, _seed) = seeded_vault(reserve, supply);
        let shares = rng.gen_range(1..=100_000u64);
        let cost = vault.preview_mint(shares).unwrap();
        let user = funded(&mut vault, cost);

        let charged = vault.mint(&user, shares, &user).unwrap();
        assert_eq!(charged, cost);
        assert_eq!(vault.asset_ledger().balance_of(&user), 0);
        let worth = vault.max_withdraw(&user);

        assert!(worth <= charged, "mint charged {} but is worth {}", charged, worth);
        assert!(vault.balance_of(&user) == shares);
    }
}

#[test]
fn test_full_exit_leaves_pool_solvent() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut vault = empty_vault();
    let accounts: Vec<AccountId> = (0..5).map(|_| funded(&mut vault, 1_000_000)).collect();

    for who in &accounts {
        let assets = rng.gen_range(1_000..=1_000_000u64);
        vault.deposit(who, assets, who).unwrap();
        vault.asset_ledger_mut().inject(rng.gen_range(0..=1_000u64)).unwrap();
        vault.harvest().unwrap();
    }

    for who in &accounts {
        let shares = vault.balance_of(who);
        vault.redeem(who, shares, who, who).unwrap();
        assert_invariants(&vault);
    }

    assert_eq!(vault.total_supply(), 0);
    assert!(vault.asset_ledger().custody() >= vault.total_assets());
}
