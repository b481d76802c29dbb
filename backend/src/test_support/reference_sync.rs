//! Reference sync double that keeps every dispatched batch.

use std::sync::Mutex;

use crate::domain::ports::ReferenceSync;
use crate::domain::{SyncBatch, SyncCommand};

/// Records batches instead of applying them.
#[derive(Default)]
pub struct RecordingReferenceSync {
    batches: Mutex<Vec<SyncBatch>>,
}

impl RecordingReferenceSync {
    /// Batches dispatched so far, oldest first.
    pub fn batches(&self) -> Vec<SyncBatch> {
        self.lock_batches().clone()
    }

    /// Every dispatched command, flattened in dispatch order.
    pub fn commands(&self) -> Vec<SyncCommand> {
        self.lock_batches()
            .iter()
            .flat_map(|batch| batch.commands().iter().cloned())
            .collect()
    }

    fn lock_batches(&self) -> std::sync::MutexGuard<'_, Vec<SyncBatch>> {
        match self.batches.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("recording sync mutex"),
        }
    }
}

impl ReferenceSync for RecordingReferenceSync {
    fn dispatch(&self, batch: SyncBatch) {
        self.lock_batches().push(batch);
    }
}
