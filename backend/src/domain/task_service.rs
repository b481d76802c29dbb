//! Task domain service.
//!
//! Implements the task driving ports over a [`DocumentStore`]. Writes to a
//! task are followed by a [`SyncBatch`] keeping the affected users'
//! `pendingTasks` in step; the batch is handed to [`ReferenceSync`] and never
//! awaited.

use std::sync::Arc;

use async_trait::async_trait;
use list_query::{Document, ListQuery, Projection};
use mockable::Clock;
use tracing::debug;

use crate::domain::document::map_store_error;
use crate::domain::ports::{Collection, DocumentStore, ReferenceSync, TaskCommand, TaskQuery};
use crate::domain::{
    Error, Listing, SyncBatch, Task, TaskDraft, TaskId, from_document, to_document,
};

const TASK_NOT_FOUND: &str = "The requested Task could not be found in the database";
const UPDATE_NOT_FOUND: &str = "The Task to be updated could not be found in the database";
const DELETE_NOT_FOUND: &str = "The Task to be deleted could not be found in the database";

/// Task service implementing [`TaskQuery`] and [`TaskCommand`].
pub struct TaskService<S: ?Sized, R: ?Sized> {
    store: Arc<S>,
    sync: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized, R: ?Sized> Clone for TaskService<S, R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sync: Arc::clone(&self.sync),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: ?Sized, R: ?Sized> TaskService<S, R> {
    /// Create a service writing through `store` and dispatching to `sync`.
    pub fn new(store: Arc<S>, sync: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { store, sync, clock }
    }
}

impl<S, R> TaskService<S, R>
where
    S: DocumentStore + ?Sized,
    R: ReferenceSync + ?Sized,
{
    async fn find_task_to_update(&self, id: &TaskId) -> Result<Task, Error> {
        let document = self
            .store
            .find_by_id(Collection::Tasks, id.as_str())
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(UPDATE_NOT_FOUND))?;
        Ok(from_document(document)?)
    }

    fn dispatch(&self, batch: SyncBatch) {
        if batch.is_empty() {
            return;
        }
        debug!(commands = batch.commands().len(), "dispatching task reference sync");
        self.sync.dispatch(batch);
    }
}

#[async_trait]
impl<S, R> TaskQuery for TaskService<S, R>
where
    S: DocumentStore + ?Sized,
    R: ReferenceSync + ?Sized,
{
    async fn list_tasks(&self, query: ListQuery) -> Result<Listing, Error> {
        if query.count {
            let count = self
                .store
                .count(Collection::Tasks, &query.filter)
                .await
                .map_err(map_store_error)?;
            return Ok(Listing::Count(count));
        }
        let documents = self
            .store
            .find_many(Collection::Tasks, &query)
            .await
            .map_err(map_store_error)?;
        Ok(Listing::Documents(documents))
    }

    async fn get_task(
        &self,
        id: &TaskId,
        projection: Option<Projection>,
    ) -> Result<Document, Error> {
        let document = self
            .store
            .find_by_id(Collection::Tasks, id.as_str())
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(TASK_NOT_FOUND))?;
        Ok(match projection {
            Some(projection) => projection.apply(document),
            None => document,
        })
    }
}

#[async_trait]
impl<S, R> TaskCommand for TaskService<S, R>
where
    S: DocumentStore + ?Sized,
    R: ReferenceSync + ?Sized,
{
    async fn create_task(&self, draft: TaskDraft) -> Result<Task, Error> {
        let document = to_document(&draft.as_new_document(self.clock.utc()))?;
        let stored = self
            .store
            .insert(Collection::Tasks, document)
            .await
            .map_err(map_store_error)?;
        let task: Task = from_document(stored)?;

        self.dispatch(SyncBatch::reassignment(task.id(), None, task.assigned_user()));
        Ok(task)
    }

    async fn update_task(&self, id: &TaskId, draft: TaskDraft) -> Result<Task, Error> {
        let existing = self.find_task_to_update(id).await?;
        let replacement = draft.apply_to(&existing);
        let stored = self
            .store
            .replace_by_id(Collection::Tasks, id.as_str(), to_document(&replacement)?)
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(UPDATE_NOT_FOUND))?;
        let task: Task = from_document(stored)?;

        self.dispatch(SyncBatch::reassignment(
            task.id(),
            existing.assigned_user(),
            task.assigned_user(),
        ));
        Ok(task)
    }

    async fn delete_task(&self, id: &TaskId) -> Result<Task, Error> {
        let removed = self
            .store
            .delete_by_id(Collection::Tasks, id.as_str())
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(DELETE_NOT_FOUND))?;
        let task: Task = from_document(removed)?;

        self.dispatch(SyncBatch::reassignment(task.id(), task.assigned_user(), None));
        Ok(task)
    }
}

#[cfg(test)]
#[path = "task_service_tests.rs"]
mod tests;
