//! Driving port for reading tasks.

use async_trait::async_trait;
use list_query::{Document, ListQuery, Projection};

use crate::domain::{Error, Listing, TaskId};

/// Domain use-case port for listing and fetching tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskQuery: Send + Sync {
    /// Evaluate a list query over all tasks.
    async fn list_tasks(&self, query: ListQuery) -> Result<Listing, Error>;

    /// Fetch one task, optionally projected.
    async fn get_task(
        &self,
        id: &TaskId,
        projection: Option<Projection>,
    ) -> Result<Document, Error>;
}
