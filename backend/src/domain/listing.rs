//! Results of list operations.

use list_query::{Document, ListQueryError};
use serde::Serialize;

use super::Error;

/// Either the selected documents or, for `count=true`, their number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Listing {
    /// Filtered, ordered, windowed and projected documents.
    Documents(Vec<Document>),
    /// Number of documents matching the filter.
    Count(u64),
}

impl From<ListQueryError> for Error {
    fn from(error: ListQueryError) -> Self {
        Self::malformed_query(format!("Invalid `{}` query parameter", error.parameter()))
            .with_details(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use list_query::ListQuery;
    use serde_json::json;

    #[test]
    fn count_serialises_as_a_bare_integer() {
        assert_eq!(serde_json::to_value(Listing::Count(3)).ok(), Some(json!(3)));
    }

    #[test]
    fn query_errors_become_malformed_query() {
        let params = list_query::ListParams {
            sort: Some("{".to_owned()),
            ..Default::default()
        };
        let error: Error = ListQuery::from_params(&params, 0)
            .expect_err("sort is not JSON")
            .into();
        assert_eq!(error.code(), ErrorCode::MalformedQuery);
        assert_eq!(error.message(), "Invalid `sort` query parameter");
    }
}
