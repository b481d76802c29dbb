//! In-memory [`DocumentStore`] adapter.
//!
//! Each collection is a vector of documents in insertion order guarded by a
//! Tokio `RwLock`. Every write, including the conflict-guarded ones and
//! `update_many`, runs under a single write guard. Nothing spans collections.

use async_trait::async_trait;
use list_query::{Document, Filter, ID_FIELD, ListQuery};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::ports::{Collection, DocumentStore, GuardedWrite, Patch, StoreError};

/// Process-local document store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    tasks: RwLock<Vec<Document>>,
    users: RwLock<Vec<Document>>,
}

impl InMemoryDocumentStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn collection(&self, collection: Collection) -> &RwLock<Vec<Document>> {
        match collection {
            Collection::Tasks => &self.tasks,
            Collection::Users => &self.users,
        }
    }
}

fn has_id(document: &Document, id: &str) -> bool {
    document.get(ID_FIELD).and_then(Value::as_str) == Some(id)
}

/// Rebuild `fields` with `_id` leading, dropping any `_id` the caller sent.
fn keyed(id: &str, fields: Document) -> Document {
    let mut document = Document::with_capacity(fields.len() + 1);
    document.insert(ID_FIELD.to_owned(), Value::String(id.to_owned()));
    document.extend(fields.into_iter().filter(|(key, _)| key != ID_FIELD));
    document
}

fn fresh_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn counted(matches: usize) -> u64 {
    u64::try_from(matches).unwrap_or(u64::MAX)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert(
        &self,
        collection: Collection,
        document: Document,
    ) -> Result<Document, StoreError> {
        let stored = keyed(&fresh_id(), document);
        self.collection(collection)
            .write()
            .await
            .push(stored.clone());
        Ok(stored)
    }

    async fn insert_unless(
        &self,
        collection: Collection,
        conflict: &Filter,
        document: Document,
    ) -> Result<GuardedWrite, StoreError> {
        let mut documents = self.collection(collection).write().await;
        if documents.iter().any(|doc| conflict.matches(doc)) {
            return Ok(GuardedWrite::Conflict);
        }
        let stored = keyed(&fresh_id(), document);
        documents.push(stored.clone());
        Ok(GuardedWrite::Written(stored))
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let documents = self.collection(collection).read().await;
        Ok(documents.iter().find(|doc| has_id(doc, id)).cloned())
    }

    async fn find_many(
        &self,
        collection: Collection,
        query: &ListQuery,
    ) -> Result<Vec<Document>, StoreError> {
        let documents = self.collection(collection).read().await;
        Ok(query.select_from(documents.iter()))
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError> {
        let documents = self.collection(collection).read().await;
        Ok(ListQuery::matching(filter.clone()).count_in(documents.iter()))
    }

    async fn replace_by_id(
        &self,
        collection: Collection,
        id: &str,
        document: Document,
    ) -> Result<Option<Document>, StoreError> {
        let mut documents = self.collection(collection).write().await;
        let Some(slot) = documents.iter_mut().find(|doc| has_id(doc, id)) else {
            return Ok(None);
        };
        *slot = keyed(id, document);
        Ok(Some(slot.clone()))
    }

    async fn replace_unless(
        &self,
        collection: Collection,
        id: &str,
        conflict: &Filter,
        document: Document,
    ) -> Result<GuardedWrite, StoreError> {
        let mut documents = self.collection(collection).write().await;
        if documents.iter().any(|doc| conflict.matches(doc)) {
            return Ok(GuardedWrite::Conflict);
        }
        let Some(slot) = documents.iter_mut().find(|doc| has_id(doc, id)) else {
            return Ok(GuardedWrite::Missing);
        };
        *slot = keyed(id, document);
        Ok(GuardedWrite::Written(slot.clone()))
    }

    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: &Patch,
    ) -> Result<Option<Document>, StoreError> {
        let mut documents = self.collection(collection).write().await;
        let Some(slot) = documents.iter_mut().find(|doc| has_id(doc, id)) else {
            return Ok(None);
        };
        patch.apply_to(slot)?;
        Ok(Some(slot.clone()))
    }

    async fn update_many(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<u64, StoreError> {
        let mut documents = self.collection(collection).write().await;
        let mut patched = Vec::new();
        for (position, document) in documents.iter().enumerate() {
            if filter.matches(document) {
                let mut copy = document.clone();
                patch.apply_to(&mut copy)?;
                patched.push((position, copy));
            }
        }
        let modified = counted(patched.len());
        for (position, document) in patched {
            if let Some(slot) = documents.get_mut(position) {
                *slot = document;
            }
        }
        Ok(modified)
    }

    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError> {
        let mut documents = self.collection(collection).write().await;
        let Some(position) = documents.iter().position(|doc| has_id(doc, id)) else {
            return Ok(None);
        };
        Ok(Some(documents.remove(position)))
    }
}
