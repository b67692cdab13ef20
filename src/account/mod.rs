// Account module - who participates in the pool

mod id;

pub use id::{AccountId, AccountIdError};
