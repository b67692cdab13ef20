// Config module - vault limits and identity

mod settings;

pub use settings::{ConfigError, VaultConfig};
