//! Driving port for user mutations.
//!
//! Implementations enforce email uniqueness and dispatch the reference sync
//! that keeps tasks' `assignedUser` in step with `pendingTasks`.

use async_trait::async_trait;

use crate::domain::{Error, User, UserDraft, UserId};

/// Domain use-case port for creating, replacing and deleting users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Insert a new user.
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Replace the editable fields of an existing user.
    async fn update_user(&self, id: &UserId, draft: UserDraft) -> Result<User, Error>;

    /// Remove a user, returning it as it was.
    async fn delete_user(&self, id: &UserId) -> Result<User, Error>;
}
