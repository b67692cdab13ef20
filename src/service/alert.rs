// Integrity alerting
// Out-of-band notification when a transition halts on a data integrity fault

use crate::vault::VaultError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tracing::error;

// ============================================================================
// ALERT TRAIT
// ============================================================================

/// Receiver of integrity faults (pager, webhook, audit log, ...)
#[async_trait]
pub trait IntegrityAlert: Send + Sync {
    async fn raise(&self, fault: &VaultError);
}

// ============================================================================
// LOG ALERT
// ============================================================================

/// Emits the fault at `error` level
#[derive(Clone, Copy, Debug, Default)]
pub struct LogAlert;

#[async_trait]
impl IntegrityAlert for LogAlert {
    async fn raise(&self, fault: &VaultError) {
        error!(fault = %fault, "vault integrity alert");
    }
}

// ============================================================================
// RECORDING ALERT
// ============================================================================

/// Keeps every raised fault; for tests and diagnostics
#[derive(Debug, Default)]
pub struct RecordingAlert {
    raised: Mutex<Vec<String>>,
    count: AtomicUsize,
}

impl RecordingAlert {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of alerts raised so far
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Messages of every alert raised so far
    pub fn messages(&self) -> Vec<String> {
        self.raised
            .lock()
            .map(|raised| raised.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl IntegrityAlert for RecordingAlert {
    async fn raise(&self, fault: &VaultError) {
        if let Ok(mut raised) = self.raised.lock() {
            raised.push(fault.to_string());
        }
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}
