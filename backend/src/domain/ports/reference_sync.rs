//! Driven port for handing off reference-sync batches.
//!
//! Services dispatch a [`SyncBatch`] after their primary write succeeds.
//! Dispatch must not block on, or report the outcome of, the secondary
//! writes; adapters own their failure reporting.

use crate::domain::SyncBatch;

/// Non-blocking sink for reference-sync batches.
#[cfg_attr(test, mockall::automock)]
pub trait ReferenceSync: Send + Sync {
    /// Queue `batch` for application.
    fn dispatch(&self, batch: SyncBatch);

    /// Whether batches are still being applied.
    fn is_running(&self) -> bool {
        true
    }
}
