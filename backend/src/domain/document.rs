//! Conversions between typed entities and schemaless store documents.

use list_query::Document;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use super::Error;
use super::ports::StoreError;

/// Failures converting between entities and documents.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The value did not encode to a JSON object.
    #[error("entity did not encode to a document")]
    NotAnObject,
    /// Encoding failed.
    #[error("failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
    /// A stored document does not have the expected shape.
    #[error("stored document is malformed: {0}")]
    Decode(#[source] serde_json::Error),
}

impl From<DocumentError> for Error {
    fn from(error: DocumentError) -> Self {
        Self::store("The database server returned an unexpected document")
            .with_details(error.to_string())
    }
}

/// Map document store failures onto the domain error surfaced to clients.
pub(crate) fn map_store_error(error: StoreError) -> Error {
    let message = match &error {
        StoreError::Connection { .. } => "The database server is unavailable",
        StoreError::Query { .. } => "The database server could not complete the request",
    };
    Error::store(message).with_details(error.to_string())
}

/// Encode `value` as a store document.
pub fn to_document<T>(value: &T) -> Result<Document, DocumentError>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(value).map_err(DocumentError::Encode)? {
        Value::Object(document) => Ok(document),
        _ => Err(DocumentError::NotAnObject),
    }
}

/// Decode a store document into `T`.
pub fn from_document<T>(document: Document) -> Result<T, DocumentError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(Value::Object(document)).map_err(DocumentError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, User};
    use serde_json::json;

    #[test]
    fn scalars_are_not_documents() {
        assert!(matches!(to_document(&42), Err(DocumentError::NotAnObject)));
    }

    #[test]
    fn malformed_documents_map_to_store_failures() {
        let document = json!({"_id": "u1"}).as_object().cloned().unwrap_or_default();
        let error: Error = from_document::<User>(document)
            .expect_err("missing fields")
            .into();
        assert_eq!(error.code(), ErrorCode::StoreFailure);
        assert!(error.details().is_some());
    }
}
