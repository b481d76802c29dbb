//! Driving port for task mutations.
//!
//! Implementations perform the primary write and dispatch any reference
//! sync needed to keep assignees' `pendingTasks` in step.

use async_trait::async_trait;

use crate::domain::{Error, Task, TaskDraft, TaskId};

/// Domain use-case port for creating, replacing and deleting tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskCommand: Send + Sync {
    /// Insert a new task.
    async fn create_task(&self, draft: TaskDraft) -> Result<Task, Error>;

    /// Replace the editable fields of an existing task.
    async fn update_task(&self, id: &TaskId, draft: TaskDraft) -> Result<Task, Error>;

    /// Remove a task, returning it as it was.
    async fn delete_task(&self, id: &TaskId) -> Result<Task, Error>;
}
