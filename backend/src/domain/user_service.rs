//! User domain service.
//!
//! Implements the user driving ports over a [`DocumentStore`]. Email
//! uniqueness is checked by the store in the same step as the write.
//! Changes to a user's `pendingTasks` or name are mirrored onto tasks through
//! a [`SyncBatch`].

use std::sync::Arc;

use async_trait::async_trait;
use list_query::{Condition, Document, Filter, ID_FIELD, ListQuery, Projection};
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::document::map_store_error;
use crate::domain::ports::{
    Collection, DocumentStore, GuardedWrite, ReferenceSync, UserCommand, UserQuery,
};
use crate::domain::{
    Error, Listing, SyncBatch, User, UserDraft, UserId, from_document, to_document,
};

const USER_NOT_FOUND: &str = "The requested User could not be found in the database";
const UPDATE_NOT_FOUND: &str = "The User to be updated could not be found in the database";
const DELETE_NOT_FOUND: &str = "The User to be deleted could not be found in the database";
const EMAIL_FIELD: &str = "email";

/// Users other than `owner` holding `email`.
fn email_taken(email: &str, owner: Option<&UserId>) -> Filter {
    let same_email = Filter::equals(EMAIL_FIELD, email);
    match owner {
        Some(owner) => Filter::And(vec![
            same_email,
            Filter::field(ID_FIELD, Condition::Ne(json!(owner.as_str()))),
        ]),
        None => same_email,
    }
}

/// Stored document from a guarded write, or the duplicate-email conflict.
fn written(outcome: GuardedWrite, email: &str) -> Result<Document, Error> {
    match outcome {
        GuardedWrite::Written(document) => Ok(document),
        GuardedWrite::Conflict => {
            info!(email, "rejected duplicate email");
            Err(Error::conflict("A User with this email already exists")
                .with_details(json!({ "email": email })))
        }
        GuardedWrite::Missing => Err(Error::not_found(UPDATE_NOT_FOUND)),
    }
}

/// User service implementing [`UserQuery`] and [`UserCommand`].
pub struct UserService<S: ?Sized, R: ?Sized> {
    store: Arc<S>,
    sync: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<S: ?Sized, R: ?Sized> Clone for UserService<S, R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sync: Arc::clone(&self.sync),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S: ?Sized, R: ?Sized> UserService<S, R> {
    /// Create a service writing through `store` and dispatching to `sync`.
    pub fn new(store: Arc<S>, sync: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { store, sync, clock }
    }
}

impl<S, R> UserService<S, R>
where
    S: DocumentStore + ?Sized,
    R: ReferenceSync + ?Sized,
{
    async fn find_user_to_update(&self, id: &UserId) -> Result<User, Error> {
        let document = self
            .store
            .find_by_id(Collection::Users, id.as_str())
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(UPDATE_NOT_FOUND))?;
        Ok(from_document(document)?)
    }

    fn dispatch(&self, batch: SyncBatch) {
        if batch.is_empty() {
            return;
        }
        debug!(commands = batch.commands().len(), "dispatching user reference sync");
        self.sync.dispatch(batch);
    }
}

#[async_trait]
impl<S, R> UserQuery for UserService<S, R>
where
    S: DocumentStore + ?Sized,
    R: ReferenceSync + ?Sized,
{
    async fn list_users(&self, query: ListQuery) -> Result<Listing, Error> {
        if query.count {
            let count = self
                .store
                .count(Collection::Users, &query.filter)
                .await
                .map_err(map_store_error)?;
            return Ok(Listing::Count(count));
        }
        let documents = self
            .store
            .find_many(Collection::Users, &query)
            .await
            .map_err(map_store_error)?;
        Ok(Listing::Documents(documents))
    }

    async fn get_user(
        &self,
        id: &UserId,
        projection: Option<Projection>,
    ) -> Result<Document, Error> {
        let document = self
            .store
            .find_by_id(Collection::Users, id.as_str())
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
        Ok(match projection {
            Some(projection) => projection.apply(document),
            None => document,
        })
    }
}

#[async_trait]
impl<S, R> UserCommand for UserService<S, R>
where
    S: DocumentStore + ?Sized,
    R: ReferenceSync + ?Sized,
{
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        let document = to_document(&draft.as_new_document(self.clock.utc()))?;
        let outcome = self
            .store
            .insert_unless(Collection::Users, &email_taken(draft.email(), None), document)
            .await
            .map_err(map_store_error)?;
        let user: User = from_document(written(outcome, draft.email())?)?;

        self.dispatch(SyncBatch::user_change(
            user.id(),
            None,
            user.name(),
            &[],
            user.pending_tasks(),
        ));
        Ok(user)
    }

    async fn update_user(&self, id: &UserId, draft: UserDraft) -> Result<User, Error> {
        let existing = self.find_user_to_update(id).await?;
        let replacement = draft.apply_to(&existing);
        let outcome = self
            .store
            .replace_unless(
                Collection::Users,
                id.as_str(),
                &email_taken(replacement.email(), Some(id)),
                to_document(&replacement)?,
            )
            .await
            .map_err(map_store_error)?;
        let user: User = from_document(written(outcome, replacement.email())?)?;

        self.dispatch(SyncBatch::user_change(
            user.id(),
            Some(existing.name()),
            user.name(),
            existing.pending_tasks(),
            user.pending_tasks(),
        ));
        Ok(user)
    }

    async fn delete_user(&self, id: &UserId) -> Result<User, Error> {
        let removed = self
            .store
            .delete_by_id(Collection::Users, id.as_str())
            .await
            .map_err(map_store_error)?
            .ok_or_else(|| Error::not_found(DELETE_NOT_FOUND))?;
        let user: User = from_document(removed)?;

        self.dispatch(SyncBatch::user_removed(user.id()));
        Ok(user)
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
