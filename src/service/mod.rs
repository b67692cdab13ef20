// Service module - serialized async access to a vault
// One lock spans pricing through settlement, so no caller sees a half-applied transition

mod alert;
mod handle;

pub use alert::{IntegrityAlert, LogAlert, RecordingAlert};
pub use handle::VaultHandle;
