//! Reference sync between `Task.assignedUser` and `User.pendingTasks`.
//!
//! Services compare the reference set before and after a primary write and
//! turn the difference into a [`SyncBatch`] of compensating commands for the
//! opposite collection. Batches are applied after the primary response by a
//! [`ReferenceSyncExecutor`]; failures are logged, never surfaced.
//!
//! The two sides are eventually consistent. A failed or interleaved
//! secondary write can leave them out of step until the next edit.

mod executor;

pub use executor::{CommandOutcome, ReferenceSyncExecutor, SyncReport};

use std::fmt;

use super::{TaskId, TraceId, UserId};

/// One compensating write against the opposite collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCommand {
    /// Add `task` to `user.pendingTasks` unless already present.
    AddPendingTask { user: UserId, task: TaskId },
    /// Remove `task` from `user.pendingTasks`.
    RemovePendingTask { user: UserId, task: TaskId },
    /// Point `task` at `user`, pulling it from any other previous assignee.
    AssignTask {
        task: TaskId,
        user: UserId,
        user_name: String,
    },
    /// Reset `task` to unassigned if it is still assigned to `from`.
    UnassignTask { task: TaskId, from: UserId },
    /// Reset every task assigned to `user`.
    UnassignAllTasks { user: UserId },
    /// Refresh `assignedUserName` on every task assigned to `user`.
    RenameAssignee { user: UserId, user_name: String },
}

impl fmt::Display for SyncCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddPendingTask { user, task } => write!(f, "add task {task} to user {user}"),
            Self::RemovePendingTask { user, task } => {
                write!(f, "remove task {task} from user {user}")
            }
            Self::AssignTask { task, user, .. } => write!(f, "assign task {task} to user {user}"),
            Self::UnassignTask { task, from } => write!(f, "unassign task {task} from user {from}"),
            Self::UnassignAllTasks { user } => write!(f, "unassign all tasks of user {user}"),
            Self::RenameAssignee { user, .. } => write!(f, "rename assignee {user} on tasks"),
        }
    }
}

/// Commands produced by one primary write, tagged with its trace identifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SyncBatch {
    commands: Vec<SyncCommand>,
    trace_id: Option<TraceId>,
}

impl SyncBatch {
    /// Batch of `commands` carrying the ambient [`TraceId`].
    pub fn new(commands: Vec<SyncCommand>) -> Self {
        Self {
            commands,
            trace_id: TraceId::current(),
        }
    }

    /// Sync for a task whose assignee went from `previous` to `next`.
    ///
    /// Creation passes `previous = None`; deletion passes `next = None`.
    ///
    /// # Examples
    /// ```
    /// use taskboard::domain::{SyncBatch, SyncCommand, TaskId, UserId};
    ///
    /// let task = TaskId::new("t1").expect("valid id");
    /// let ada = UserId::new("u1").expect("valid id");
    /// let batch = SyncBatch::reassignment(&task, None, Some(&ada));
    /// assert_eq!(
    ///     batch.commands(),
    ///     [SyncCommand::AddPendingTask { user: ada, task }]
    /// );
    /// ```
    pub fn reassignment(task: &TaskId, previous: Option<&UserId>, next: Option<&UserId>) -> Self {
        if previous == next {
            return Self::new(Vec::new());
        }
        let removal = previous.map(|user| SyncCommand::RemovePendingTask {
            user: user.clone(),
            task: task.clone(),
        });
        let addition = next.map(|user| SyncCommand::AddPendingTask {
            user: user.clone(),
            task: task.clone(),
        });
        Self::new(removal.into_iter().chain(addition).collect())
    }

    /// Sync for a user whose name or `pendingTasks` changed.
    ///
    /// Creation passes an empty `previous_tasks` and `previous_name = None`.
    pub fn user_change(
        user: &UserId,
        previous_name: Option<&str>,
        name: &str,
        previous_tasks: &[TaskId],
        tasks: &[TaskId],
    ) -> Self {
        let rename = previous_name
            .filter(|previous| *previous != name)
            .map(|_| SyncCommand::RenameAssignee {
                user: user.clone(),
                user_name: name.to_owned(),
            });
        let unassign = difference(previous_tasks, tasks).map(|task| SyncCommand::UnassignTask {
            task: task.clone(),
            from: user.clone(),
        });
        let assign = difference(tasks, previous_tasks).map(|task| SyncCommand::AssignTask {
            task: task.clone(),
            user: user.clone(),
            user_name: name.to_owned(),
        });
        Self::new(rename.into_iter().chain(unassign).chain(assign).collect())
    }

    /// Sync for a deleted user.
    pub fn user_removed(user: &UserId) -> Self {
        Self::new(vec![SyncCommand::UnassignAllTasks { user: user.clone() }])
    }

    /// Commands in application order.
    pub fn commands(&self) -> &[SyncCommand] {
        &self.commands
    }

    /// Trace identifier of the originating request.
    pub fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }

    /// Whether there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Split into commands and trace identifier.
    pub fn into_parts(self) -> (Vec<SyncCommand>, Option<TraceId>) {
        (self.commands, self.trace_id)
    }
}

/// Elements of `left` absent from `right`, in `left`'s order.
pub fn difference<'a, T: PartialEq>(left: &'a [T], right: &'a [T]) -> impl Iterator<Item = &'a T> {
    left.iter().filter(move |item| !right.contains(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn task(raw: &str) -> TaskId {
        TaskId::new(raw).expect("valid task id")
    }

    fn user(raw: &str) -> UserId {
        UserId::new(raw).expect("valid user id")
    }

    #[rstest]
    fn difference_preserves_left_order() {
        let left = [task("t3"), task("t1"), task("t2")];
        let right = [task("t1")];
        let ids: Vec<&str> = difference(&left, &right).map(TaskId::as_str).collect();
        assert_eq!(ids, ["t3", "t2"]);
    }

    #[rstest]
    #[case(None, None, 0)]
    #[case(Some("u1"), Some("u1"), 0)]
    #[case(None, Some("u1"), 1)]
    #[case(Some("u1"), None, 1)]
    #[case(Some("u1"), Some("u2"), 2)]
    fn reassignment_emits_one_command_per_changed_side(
        #[case] previous: Option<&str>,
        #[case] next: Option<&str>,
        #[case] expected: usize,
    ) {
        let previous = previous.map(user);
        let next = next.map(user);
        let batch = SyncBatch::reassignment(&task("t1"), previous.as_ref(), next.as_ref());
        assert_eq!(batch.commands().len(), expected);
    }

    #[rstest]
    fn reassignment_removes_before_adding() {
        let batch = SyncBatch::reassignment(&task("t1"), Some(&user("a")), Some(&user("b")));
        assert_eq!(
            batch.commands(),
            [
                SyncCommand::RemovePendingTask {
                    user: user("a"),
                    task: task("t1")
                },
                SyncCommand::AddPendingTask {
                    user: user("b"),
                    task: task("t1")
                },
            ]
        );
    }

    #[rstest]
    fn user_change_assigns_added_and_unassigns_removed() {
        let batch = SyncBatch::user_change(
            &user("u1"),
            Some("Ada"),
            "Ada",
            &[task("t1"), task("t2")],
            &[task("t2"), task("t3")],
        );
        assert_eq!(
            batch.commands(),
            [
                SyncCommand::UnassignTask {
                    task: task("t1"),
                    from: user("u1")
                },
                SyncCommand::AssignTask {
                    task: task("t3"),
                    user: user("u1"),
                    user_name: "Ada".to_owned()
                },
            ]
        );
    }

    #[rstest]
    fn user_change_renames_before_reassigning() {
        let batch = SyncBatch::user_change(&user("u1"), Some("Ada"), "Grace", &[], &[task("t1")]);
        assert!(matches!(
            batch.commands().first(),
            Some(SyncCommand::RenameAssignee { user_name, .. }) if user_name == "Grace"
        ));
        assert_eq!(batch.commands().len(), 2);
    }

    #[rstest]
    fn unchanged_user_needs_no_sync() {
        let tasks = [task("t1")];
        let batch = SyncBatch::user_change(&user("u1"), Some("Ada"), "Ada", &tasks, &tasks);
        assert!(batch.is_empty());
    }

    #[tokio::test]
    async fn batches_capture_the_ambient_trace_id() {
        let trace_id = TraceId::generate();
        let batch = TraceId::scope(trace_id, async { SyncBatch::user_removed(&user("u1")) }).await;
        assert_eq!(batch.trace_id(), Some(trace_id));
    }
}
