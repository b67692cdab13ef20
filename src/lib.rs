// sharevault - pooled-asset accounting engine
//
// Participants deposit a base asset and receive proportional shares; shares
// are later redeemed for the matching slice of the reserve. Every conversion
// rounds toward the pool.

pub mod account;
pub mod accounting;
pub mod config;
pub mod ledger;
pub mod policy;
pub mod service;
pub mod storage;
pub mod vault;
