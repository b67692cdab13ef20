// Policy module - pluggable deposit/withdraw limits

mod limits;

pub use limits::{CappedPolicy, Policy, Unbounded};
