//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps them to status
//! codes and the `{message, data}` response envelope.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

use super::TraceId;

/// Stable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// Required input is missing or invalid.
    ValidationFailed,
    /// A unique field collides with an existing record.
    Conflict,
    /// The identifier does not resolve to a record.
    NotFound,
    /// A list-query parameter could not be parsed.
    MalformedQuery,
    /// The document store failed or returned unusable data.
    StoreFailure,
}

impl ErrorCode {
    /// Machine-readable name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationFailed => "validation_failed",
            Self::Conflict => "conflict",
            Self::NotFound => "not_found",
            Self::MalformedQuery => "malformed_query",
            Self::StoreFailure => "store_failure",
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            Self::ValidationFailed => "The request body is invalid",
            Self::Conflict => "The request conflicts with an existing record",
            Self::NotFound => "The requested record could not be found",
            Self::MalformedQuery => "The query parameters could not be parsed",
            Self::StoreFailure => "The database server could not complete the request",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors emitted by the fallible constructors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorValidationError {
    /// The message is blank.
    #[error("error message must not be empty")]
    EmptyMessage,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace.
/// - `trace_id` is captured from the ambient [`TraceId`] at construction.
///
/// # Examples
/// ```
/// use taskboard::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Task not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "Task not found");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
    trace_id: Option<TraceId>,
}

impl Error {
    /// Create an error, substituting the code's stock message for a blank one.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message)
            .unwrap_or_else(|_| Self::bare(code, code.fallback_message().to_owned()))
    }

    /// Fallible constructor that rejects blank messages.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self::bare(code, message))
    }

    fn bare(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            trace_id: TraceId::current(),
        }
    }

    /// Failure category.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable summary.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Underlying failure detail, surfaced to clients as `errorMessage`.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Trace identifier active when the error was raised.
    pub fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }

    /// Attach failure detail.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<Value>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Override the captured trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Convenience constructor for [`ErrorCode::ValidationFailed`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::MalformedQuery`].
    pub fn malformed_query(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedQuery, message)
    }

    /// Convenience constructor for [`ErrorCode::StoreFailure`].
    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreFailure, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}
