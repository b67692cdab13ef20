// Accounting module - asset/share conversion
// Pure functions over a (reserve, supply) snapshot; every direction rounds toward the pool

mod convert;
mod snapshot;

pub use convert::{
    assets_for_mint, assets_for_withdraw, convert_to_assets, convert_to_shares,
    shares_for_deposit, shares_to_burn, AccountingError,
};
pub use snapshot::{Amount, PoolSnapshot};
