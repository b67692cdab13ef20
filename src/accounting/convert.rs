// Conversions between asset units and share units
//
// Deposit pricing and share->asset payouts round DOWN. Asset-denominated
// withdrawals (shares to burn) and share-denominated mints (assets to charge)
// round UP. Either way the acting party never gets the last unit.

use super::snapshot::{Amount, PoolSnapshot};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccountingError {
    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Conversion of {input} units rounds to zero")]
    ZeroResult { input: Amount },

    #[error("Arithmetic overflow")]
    Overflow,
}

fn mul_div_down(x: Amount, num: Amount, den: Amount) -> Result<Amount, AccountingError> {
    let product = x as u128 * num as u128;
    let quotient = product
        .checked_div(den as u128)
        .ok_or(AccountingError::Overflow)?;
    Amount::try_from(quotient).map_err(|_| AccountingError::Overflow)
}

fn mul_div_up(x: Amount, num: Amount, den: Amount) -> Result<Amount, AccountingError> {
    if den == 0 {
        return Err(AccountingError::Overflow);
    }
    let product = x as u128 * num as u128;
    let quotient = product.div_ceil(den as u128);
    Amount::try_from(quotient).map_err(|_| AccountingError::Overflow)
}

fn non_zero(result: Amount, input: Amount) -> Result<Amount, AccountingError> {
    if result == 0 {
        return Err(AccountingError::ZeroResult { input });
    }
    Ok(result)
}

/// Shares minted for depositing `assets`: `floor(assets * supply / reserve)`
///
/// An empty pool pegs 1 asset unit to 1 share unit.
pub fn shares_for_deposit(assets: Amount, pool: PoolSnapshot) -> Result<Amount, AccountingError> {
    if assets == 0 {
        return Err(AccountingError::ZeroAmount);
    }
    if pool.is_bootstrap() {
        return Ok(assets);
    }
    let shares = mul_div_down(assets, pool.supply(), pool.reserve())?;
    non_zero(shares, assets)
}

/// Assets paid out for burning `shares`: `floor(shares * reserve / supply)`
pub fn assets_for_withdraw(shares: Amount, pool: PoolSnapshot) -> Result<Amount, AccountingError> {
    if shares == 0 {
        return Err(AccountingError::ZeroAmount);
    }
    if pool.supply() == 0 {
        return Ok(shares);
    }
    let assets = mul_div_down(shares, pool.reserve(), pool.supply())?;
    non_zero(assets, shares)
}

/// Shares that must be burned to take out exactly `assets`: `ceil(assets * supply / reserve)`
pub fn shares_to_burn(assets: Amount, pool: PoolSnapshot) -> Result<Amount, AccountingError> {
    if assets == 0 {
        return Err(AccountingError::ZeroAmount);
    }
    if pool.is_bootstrap() {
        return Ok(assets);
    }
    let shares = mul_div_up(assets, pool.supply(), pool.reserve())?;
    non_zero(shares, assets)
}

/// Assets charged for minting exactly `shares`: `ceil(shares * reserve / supply)`
pub fn assets_for_mint(shares: Amount, pool: PoolSnapshot) -> Result<Amount, AccountingError> {
    if shares == 0 {
        return Err(AccountingError::ZeroAmount);
    }
    if pool.is_bootstrap() {
        return Ok(shares);
    }
    let assets = mul_div_up(shares, pool.reserve(), pool.supply())?;
    non_zero(assets, shares)
}

/// Informational floor conversion; zero is a valid answer, overflow saturates
pub fn convert_to_shares(assets: Amount, pool: PoolSnapshot) -> Amount {
    if pool.is_bootstrap() {
        return assets;
    }
    mul_div_down(assets, pool.supply(), pool.reserve()).unwrap_or(Amount::MAX)
}

/// Informational floor conversion; zero is a valid answer, overflow saturates
pub fn convert_to_assets(shares: Amount, pool: PoolSnapshot) -> Amount {
    if pool.supply() == 0 {
        return shares;
    }
    mul_div_down(shares, pool.reserve(), pool.supply()).unwrap_or(Amount::MAX)
}
