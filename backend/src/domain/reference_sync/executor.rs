//! Applies reference-sync commands against the document store.

use std::sync::Arc;

use list_query::{Filter, ID_FIELD};
use serde_json::Value;
use tracing::field::display;
use tracing::{debug, error, warn};

use super::{SyncBatch, SyncCommand};
use crate::domain::ports::{Collection, DocumentStore, Patch, StoreError};
use crate::domain::{TraceId, UNASSIGNED_NAME};

const ASSIGNED_USER: &str = "assignedUser";
const ASSIGNED_USER_NAME: &str = "assignedUserName";
const PENDING_TASKS: &str = "pendingTasks";

/// Result of applying one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The write went through.
    Applied,
    /// No document matched the command's target.
    Missing,
}

/// Tally of a batch application.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    /// Commands that modified their target.
    pub applied: usize,
    /// Commands whose target did not exist.
    pub missing: usize,
    /// Commands the store rejected.
    pub failed: usize,
}

/// Applies [`SyncBatch`]es one command at a time, without retries.
pub struct ReferenceSyncExecutor<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for ReferenceSyncExecutor<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn unassigned() -> Patch {
    Patch::new()
        .set(ASSIGNED_USER, "")
        .set(ASSIGNED_USER_NAME, UNASSIGNED_NAME)
}

fn assigned_to(user: &str) -> Filter {
    Filter::equals(ASSIGNED_USER, user)
}

impl<S> ReferenceSyncExecutor<S>
where
    S: DocumentStore + ?Sized,
{
    /// Executor writing through `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Apply every command of `batch` inside the batch's trace scope.
    ///
    /// Failures are logged and counted; later commands still run.
    pub async fn apply(&self, batch: SyncBatch) -> SyncReport {
        let (commands, trace_id) = batch.into_parts();
        TraceId::scope_optional(trace_id, self.apply_all(commands)).await
    }

    async fn apply_all(&self, commands: Vec<SyncCommand>) -> SyncReport {
        let trace_id = TraceId::current().map(display);
        let mut report = SyncReport::default();
        for command in commands {
            match self.apply_command(&command).await {
                Ok(CommandOutcome::Applied) => {
                    report.applied += 1;
                    debug!(trace_id, command = %command, "reference sync applied");
                }
                Ok(CommandOutcome::Missing) => {
                    report.missing += 1;
                    warn!(trace_id, command = %command, "reference sync target not found");
                }
                Err(err) => {
                    report.failed += 1;
                    error!(trace_id, command = %command, error = %err, "reference sync write failed");
                }
            }
        }
        report
    }

    /// Apply a single command.
    ///
    /// # Errors
    /// Propagates the first [`StoreError`] raised by the store.
    pub async fn apply_command(&self, command: &SyncCommand) -> Result<CommandOutcome, StoreError> {
        match command {
            SyncCommand::AddPendingTask { user, task } => {
                let patch = Patch::new().add_to_set(PENDING_TASKS, task.as_str());
                self.patch_one(Collection::Users, user.as_str(), &patch).await
            }
            SyncCommand::RemovePendingTask { user, task } => {
                let patch = Patch::new().pull(PENDING_TASKS, task.as_str());
                self.patch_one(Collection::Users, user.as_str(), &patch).await
            }
            SyncCommand::AssignTask {
                task,
                user,
                user_name,
            } => {
                let Some(current) = self.store.find_by_id(Collection::Tasks, task.as_str()).await?
                else {
                    return Ok(CommandOutcome::Missing);
                };
                let previous = current
                    .get(ASSIGNED_USER)
                    .and_then(Value::as_str)
                    .filter(|previous| !previous.is_empty() && *previous != user.as_str());
                if let Some(previous) = previous {
                    let pull = Patch::new().pull(PENDING_TASKS, task.as_str());
                    if self.patch_one(Collection::Users, previous, &pull).await?
                        == CommandOutcome::Missing
                    {
                        debug!(user = previous, "previous assignee no longer exists");
                    }
                }
                let patch = Patch::new()
                    .set(ASSIGNED_USER, user.as_str())
                    .set(ASSIGNED_USER_NAME, user_name.as_str());
                self.patch_one(Collection::Tasks, task.as_str(), &patch).await
            }
            SyncCommand::UnassignTask { task, from } => {
                let filter = Filter::And(vec![
                    Filter::equals(ID_FIELD, task.as_str()),
                    assigned_to(from.as_str()),
                ]);
                let modified = self
                    .store
                    .update_many(Collection::Tasks, &filter, &unassigned())
                    .await?;
                Ok(if modified == 0 {
                    CommandOutcome::Missing
                } else {
                    CommandOutcome::Applied
                })
            }
            SyncCommand::UnassignAllTasks { user } => {
                let modified = self
                    .store
                    .update_many(Collection::Tasks, &assigned_to(user.as_str()), &unassigned())
                    .await?;
                debug!(user = %user, modified, "tasks unassigned");
                Ok(CommandOutcome::Applied)
            }
            SyncCommand::RenameAssignee { user, user_name } => {
                let patch = Patch::new().set(ASSIGNED_USER_NAME, user_name.as_str());
                let modified = self
                    .store
                    .update_many(Collection::Tasks, &assigned_to(user.as_str()), &patch)
                    .await?;
                debug!(user = %user, modified, "assignee name refreshed");
                Ok(CommandOutcome::Applied)
            }
        }
    }

    async fn patch_one(
        &self,
        collection: Collection,
        id: &str,
        patch: &Patch,
    ) -> Result<CommandOutcome, StoreError> {
        Ok(match self.store.update_by_id(collection, id, patch).await? {
            Some(_) => CommandOutcome::Applied,
            None => CommandOutcome::Missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockDocumentStore;
    use crate::domain::{TaskId, UserId};
    use list_query::Document;
    use rstest::rstest;
    use serde_json::json;

    fn document(value: Value) -> Document {
        value.as_object().cloned().unwrap_or_default()
    }

    fn executor(store: MockDocumentStore) -> ReferenceSyncExecutor<MockDocumentStore> {
        ReferenceSyncExecutor::new(Arc::new(store))
    }

    fn task(raw: &str) -> TaskId {
        TaskId::new(raw).expect("valid task id")
    }

    fn user(raw: &str) -> UserId {
        UserId::new(raw).expect("valid user id")
    }

    #[rstest]
    #[tokio::test]
    async fn add_pending_task_patches_the_user() {
        let mut store = MockDocumentStore::new();
        store
            .expect_update_by_id()
            .withf(|collection, id, patch| {
                *collection == Collection::Users
                    && id == "u1"
                    && patch == &Patch::new().add_to_set(PENDING_TASKS, "t1")
            })
            .times(1)
            .return_once(|_, _, _| Ok(Some(Document::new())));

        let outcome = executor(store)
            .apply_command(&SyncCommand::AddPendingTask {
                user: user("u1"),
                task: task("t1"),
            })
            .await
            .expect("command applies");
        assert_eq!(outcome, CommandOutcome::Applied);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_user_is_reported_not_failed() {
        let mut store = MockDocumentStore::new();
        store
            .expect_update_by_id()
            .times(1)
            .return_once(|_, _, _| Ok(None));

        let outcome = executor(store)
            .apply_command(&SyncCommand::RemovePendingTask {
                user: user("ghost"),
                task: task("t1"),
            })
            .await
            .expect("command applies");
        assert_eq!(outcome, CommandOutcome::Missing);
    }

    #[rstest]
    #[tokio::test]
    async fn assign_task_pulls_it_from_the_previous_assignee() {
        let mut store = MockDocumentStore::new();
        store
            .expect_find_by_id()
            .withf(|collection, id| *collection == Collection::Tasks && id == "t1")
            .times(1)
            .return_once(|_, _| Ok(Some(document(json!({"_id": "t1", "assignedUser": "old"})))));
        store
            .expect_update_by_id()
            .withf(|collection, id, _| *collection == Collection::Users && id == "old")
            .times(1)
            .return_once(|_, _, _| Ok(Some(Document::new())));
        store
            .expect_update_by_id()
            .withf(|collection, id, patch| {
                *collection == Collection::Tasks
                    && id == "t1"
                    && patch
                        == &Patch::new()
                            .set(ASSIGNED_USER, "u1")
                            .set(ASSIGNED_USER_NAME, "Ada")
            })
            .times(1)
            .return_once(|_, _, _| Ok(Some(Document::new())));

        let outcome = executor(store)
            .apply_command(&SyncCommand::AssignTask {
                task: task("t1"),
                user: user("u1"),
                user_name: "Ada".to_owned(),
            })
            .await
            .expect("command applies");
        assert_eq!(outcome, CommandOutcome::Applied);
    }

    #[rstest]
    #[tokio::test]
    async fn unassign_task_is_conditional_on_current_assignee() {
        let mut store = MockDocumentStore::new();
        store
            .expect_update_many()
            .withf(|collection, filter, patch| {
                *collection == Collection::Tasks
                    && *filter
                        == Filter::And(vec![
                            Filter::equals(ID_FIELD, "t1"),
                            Filter::equals(ASSIGNED_USER, "u1"),
                        ])
                    && *patch == unassigned()
            })
            .times(1)
            .return_once(|_, _, _| Ok(0));

        let outcome = executor(store)
            .apply_command(&SyncCommand::UnassignTask {
                task: task("t1"),
                from: user("u1"),
            })
            .await
            .expect("command applies");
        assert_eq!(outcome, CommandOutcome::Missing);
    }

    #[rstest]
    #[tokio::test]
    async fn failures_do_not_stop_the_batch() {
        let mut store = MockDocumentStore::new();
        let mut calls = 0;
        store.expect_update_by_id().times(2).returning(move |_, _, _| {
            calls += 1;
            if calls == 1 {
                Err(StoreError::connection("down"))
            } else {
                Ok(Some(Document::new()))
            }
        });

        let batch = SyncBatch::reassignment(&task("t1"), Some(&user("a")), Some(&user("b")));
        let report = executor(store).apply(batch).await;
        assert_eq!(
            report,
            SyncReport {
                applied: 1,
                missing: 0,
                failed: 1
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn batches_run_in_their_originating_trace_scope() {
        let trace_id = TraceId::generate();
        let mut store = MockDocumentStore::new();
        store
            .expect_update_many()
            .times(1)
            .returning(move |_, _, _| {
                assert_eq!(TraceId::current(), Some(trace_id));
                Ok(2)
            });

        let batch = TraceId::scope(trace_id, async { SyncBatch::user_removed(&user("u1")) }).await;
        let report = executor(store).apply(batch).await;
        assert_eq!(report.applied, 1);
    }
}
