//! Driven port for schemaless document persistence.
//!
//! Adapters store tasks and users as JSON objects keyed by `_id`. Each
//! single-document operation is atomic; nothing spans documents.

use std::fmt;

use async_trait::async_trait;
use list_query::{Document, Filter, ID_FIELD, ListQuery};
use serde_json::Value;
use thiserror::Error;

/// Collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    /// Task documents.
    Tasks,
    /// User documents.
    Users,
}

impl Collection {
    /// Collection name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persistence errors raised by document store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("document store connection failed: {message}")]
    Connection { message: String },
    /// The operation was rejected or failed during execution.
    #[error("document store query failed: {message}")]
    Query { message: String },
}

impl StoreError {
    /// Build a [`StoreError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Build a [`StoreError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// One field-level modification.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    /// Overwrite the field.
    Set { field: String, value: Value },
    /// Append to an array field unless an equal element is present.
    AddToSet { field: String, value: Value },
    /// Remove every equal element from an array field.
    Pull { field: String, value: Value },
}

/// Ordered list of field modifications applied to one document.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use taskboard::domain::ports::Patch;
///
/// let mut document = json!({"_id": "u1", "pendingTasks": ["t1"]})
///     .as_object()
///     .cloned()
///     .expect("object");
/// Patch::new()
///     .add_to_set("pendingTasks", "t1")
///     .add_to_set("pendingTasks", "t2")
///     .apply_to(&mut document)
///     .expect("patch applies");
/// assert_eq!(document["pendingTasks"], json!(["t1", "t2"]));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

impl Patch {
    /// Empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a [`PatchOp::Set`].
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(PatchOp::Set {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Append a [`PatchOp::AddToSet`].
    #[must_use]
    pub fn add_to_set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(PatchOp::AddToSet {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Append a [`PatchOp::Pull`].
    #[must_use]
    pub fn pull(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.ops.push(PatchOp::Pull {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Apply every operation to `document`.
    ///
    /// The document is left untouched when any operation is rejected.
    ///
    /// # Errors
    /// [`StoreError::Query`] when an operation targets `_id` or treats a
    /// non-array field as an array.
    pub fn apply_to(&self, document: &mut Document) -> Result<(), StoreError> {
        let mut patched = document.clone();
        for op in &self.ops {
            match op {
                PatchOp::Set { field, value } => {
                    guard_identifier(field)?;
                    patched.insert(field.clone(), value.clone());
                }
                PatchOp::AddToSet { field, value } => {
                    guard_identifier(field)?;
                    let entry = patched
                        .entry(field.clone())
                        .or_insert_with(|| Value::Array(Vec::new()));
                    let items = array_field(field, entry)?;
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
                PatchOp::Pull { field, value } => {
                    guard_identifier(field)?;
                    if let Some(entry) = patched.get_mut(field) {
                        array_field(field, entry)?.retain(|item| item != value);
                    }
                }
            }
        }
        *document = patched;
        Ok(())
    }
}

fn guard_identifier(field: &str) -> Result<(), StoreError> {
    if field == ID_FIELD {
        return Err(StoreError::query(format!("`{ID_FIELD}` is immutable")));
    }
    Ok(())
}

fn array_field<'a>(field: &str, value: &'a mut Value) -> Result<&'a mut Vec<Value>, StoreError> {
    match value {
        Value::Array(items) => Ok(items),
        _ => Err(StoreError::query(format!("`{field}` is not an array"))),
    }
}

/// Result of a write that is refused when a conflicting document exists.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardedWrite {
    /// The write happened; carries the stored document.
    Written(Document),
    /// A document matching the conflict filter exists; nothing was written.
    Conflict,
    /// The target document does not exist; nothing was written.
    Missing,
}

/// Document persistence used by the task and user services.
///
/// By-id operations return `Ok(None)` when no document has the identifier.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `document`, assigning a fresh `_id`; returns the stored document.
    async fn insert(&self, collection: Collection, document: Document)
    -> Result<Document, StoreError>;

    /// Insert `document` unless a document matches `conflict`.
    ///
    /// The check and the insert are one atomic step, so two callers racing
    /// on the same key cannot both write.
    async fn insert_unless(
        &self,
        collection: Collection,
        conflict: &Filter,
        document: Document,
    ) -> Result<GuardedWrite, StoreError>;

    /// Fetch one document.
    async fn find_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;

    /// Evaluate `query` (filter, sort, window, projection); the count flag is
    /// not consulted.
    async fn find_many(
        &self,
        collection: Collection,
        query: &ListQuery,
    ) -> Result<Vec<Document>, StoreError>;

    /// Count documents matching `filter`.
    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, StoreError>;

    /// Replace a document's fields, keeping its `_id`; returns the new document.
    async fn replace_by_id(
        &self,
        collection: Collection,
        id: &str,
        document: Document,
    ) -> Result<Option<Document>, StoreError>;

    /// Replace a document's fields unless a document matches `conflict`,
    /// checking and writing in one atomic step.
    async fn replace_unless(
        &self,
        collection: Collection,
        id: &str,
        conflict: &Filter,
        document: Document,
    ) -> Result<GuardedWrite, StoreError>;

    /// Patch one document; returns the patched document.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: &Patch,
    ) -> Result<Option<Document>, StoreError>;

    /// Patch every document matching `filter`; returns how many were patched.
    async fn update_many(
        &self,
        collection: Collection,
        filter: &Filter,
        patch: &Patch,
    ) -> Result<u64, StoreError>;

    /// Remove one document; returns it as it was before removal.
    async fn delete_by_id(
        &self,
        collection: Collection,
        id: &str,
    ) -> Result<Option<Document>, StoreError>;
}
