//! Parse failures for list query parameters.

use std::fmt;

use thiserror::Error;

/// Query-string parameter that failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    /// The `where` filter expression.
    Where,
    /// The `sort` specification.
    Sort,
    /// The `select` projection.
    Select,
    /// The `skip` offset.
    Skip,
    /// The `limit` page size.
    Limit,
    /// The `count` flag.
    Count,
}

impl Parameter {
    /// Query-string name of the parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Where => "where",
            Self::Sort => "sort",
            Self::Select => "select",
            Self::Skip => "skip",
            Self::Limit => "limit",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while turning raw list parameters into a [`crate::ListQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListQueryError {
    /// The parameter text is not JSON.
    #[error("{parameter} is not valid JSON: {message}")]
    InvalidJson {
        /// Offending parameter.
        parameter: Parameter,
        /// Parser diagnostic.
        message: String,
    },
    /// The parameter is JSON but not a valid expression of its kind.
    #[error("{parameter} is malformed: {message}")]
    InvalidExpression {
        /// Offending parameter.
        parameter: Parameter,
        /// What was wrong with the expression.
        message: String,
    },
    /// A numeric parameter is not a non-negative integer.
    #[error("{parameter} must be a non-negative integer, got `{value}`")]
    InvalidInteger {
        /// Offending parameter.
        parameter: Parameter,
        /// Raw value as received.
        value: String,
    },
    /// The count flag is neither `true` nor `false`.
    #[error("count must be `true` or `false`, got `{value}`")]
    InvalidFlag {
        /// Raw value as received.
        value: String,
    },
}

impl ListQueryError {
    /// Parameter the error refers to.
    #[must_use]
    pub const fn parameter(&self) -> Parameter {
        match self {
            Self::InvalidJson { parameter, .. }
            | Self::InvalidExpression { parameter, .. }
            | Self::InvalidInteger { parameter, .. } => *parameter,
            Self::InvalidFlag { .. } => Parameter::Count,
        }
    }

    pub(crate) fn expression(parameter: Parameter, message: impl Into<String>) -> Self {
        Self::InvalidExpression {
            parameter,
            message: message.into(),
        }
    }
}

/// Parse JSON text for `parameter`, mapping syntax errors to [`ListQueryError`].
pub(crate) fn parse_json(
    parameter: Parameter,
    text: &str,
) -> Result<serde_json::Value, ListQueryError> {
    serde_json::from_str(text).map_err(|err| ListQueryError::InvalidJson {
        parameter,
        message: err.to_string(),
    })
}
