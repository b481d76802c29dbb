//! Channel-backed [`ReferenceSync`] adapter.
//!
//! [`ChannelReferenceSync`] pushes batches onto an unbounded Tokio channel so
//! that dispatch never waits on the store. A single [`ReferenceSyncWorker`]
//! drains the channel and applies batches in dispatch order, which keeps
//! commands from one request ahead of those from any later request.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::domain::ports::{DocumentStore, ReferenceSync};
use crate::domain::{ReferenceSyncExecutor, SyncBatch};

/// Sending half handed to the services.
#[derive(Debug, Clone)]
pub struct ChannelReferenceSync {
    sender: UnboundedSender<SyncBatch>,
}

impl ReferenceSync for ChannelReferenceSync {
    fn dispatch(&self, batch: SyncBatch) {
        if let Err(rejected) = self.sender.send(batch) {
            let batch = rejected.0;
            error!(
                trace_id = batch.trace_id().map(display),
                commands = batch.commands().len(),
                "reference sync worker stopped; batch dropped"
            );
        }
    }

    fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }
}

/// Background task applying dispatched batches.
pub struct ReferenceSyncWorker<S: ?Sized> {
    receiver: UnboundedReceiver<SyncBatch>,
    executor: ReferenceSyncExecutor<S>,
}

impl<S> ReferenceSyncWorker<S>
where
    S: DocumentStore + ?Sized,
{
    /// Apply batches until every [`ChannelReferenceSync`] has been dropped.
    pub async fn run(mut self) {
        info!("reference sync worker started");
        while let Some(batch) = self.receiver.recv().await {
            let report = self.executor.apply(batch).await;
            debug!(
                applied = report.applied,
                missing = report.missing,
                failed = report.failed,
                "reference sync batch finished"
            );
        }
        info!("reference sync worker stopped");
    }
}

/// Connect a dispatcher to a worker writing through `store`.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use taskboard::domain::ports::ReferenceSync;
/// use taskboard::outbound::{InMemoryDocumentStore, reference_sync_channel};
///
/// let (sync, worker) = reference_sync_channel(Arc::new(InMemoryDocumentStore::new()));
/// assert!(sync.is_running());
/// drop(worker);
/// assert!(!sync.is_running());
/// ```
pub fn reference_sync_channel<S>(store: Arc<S>) -> (ChannelReferenceSync, ReferenceSyncWorker<S>)
where
    S: DocumentStore + ?Sized,
{
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        ChannelReferenceSync { sender },
        ReferenceSyncWorker {
            receiver,
            executor: ReferenceSyncExecutor::new(store),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Collection;
    use crate::domain::{SyncCommand, TaskId, UserId};
    use crate::outbound::InMemoryDocumentStore;
    use list_query::{Document, ID_FIELD};
    use serde_json::json;

    async fn insert_user(store: &InMemoryDocumentStore) -> UserId {
        let document: Document = json!({"name": "Ada", "pendingTasks": []})
            .as_object()
            .cloned()
            .unwrap_or_default();
        let stored = store
            .insert(Collection::Users, document)
            .await
            .expect("insert succeeds");
        UserId::new(stored[ID_FIELD].as_str().unwrap_or_default()).expect("valid id")
    }

    #[tokio::test]
    async fn worker_applies_batches_in_dispatch_order() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let user = insert_user(&store).await;
        let (sync, worker) = reference_sync_channel(Arc::clone(&store));
        let task = TaskId::new("t1").expect("valid id");

        sync.dispatch(SyncBatch::new(vec![SyncCommand::AddPendingTask {
            user: user.clone(),
            task: task.clone(),
        }]));
        sync.dispatch(SyncBatch::new(vec![
            SyncCommand::RemovePendingTask {
                user: user.clone(),
                task: task.clone(),
            },
            SyncCommand::AddPendingTask {
                user: user.clone(),
                task: TaskId::new("t2").expect("valid id"),
            },
        ]));
        drop(sync);
        worker.run().await;

        let stored = store
            .find_by_id(Collection::Users, user.as_str())
            .await
            .expect("lookup succeeds")
            .expect("user exists");
        assert_eq!(stored["pendingTasks"], json!(["t2"]));
    }

    #[tokio::test]
    async fn dispatch_after_worker_exit_is_dropped() {
        let (sync, worker) = reference_sync_channel(Arc::new(InMemoryDocumentStore::new()));
        drop(worker);

        assert!(!sync.is_running());
        sync.dispatch(SyncBatch::user_removed(
            &UserId::new("u1").expect("valid id"),
        ));
    }
}
