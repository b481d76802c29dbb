//! Driving port for reading users.

use async_trait::async_trait;
use list_query::{Document, ListQuery, Projection};

use crate::domain::{Error, Listing, UserId};

/// Domain use-case port for listing and fetching users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Evaluate a list query over all users.
    async fn list_users(&self, query: ListQuery) -> Result<Listing, Error>;

    /// Fetch one user, optionally projected.
    async fn get_user(
        &self,
        id: &UserId,
        projection: Option<Projection>,
    ) -> Result<Document, Error>;
}
