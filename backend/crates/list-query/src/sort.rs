//! Sort specifications.

use std::cmp::Ordering;

use serde_json::Value;

use crate::Document;
use crate::error::{ListQueryError, Parameter, parse_json};
use crate::value::{lookup, total_order};

/// Direction applied to one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

impl SortDirection {
    fn from_json(field: &str, value: &Value) -> Result<Self, ListQueryError> {
        let direction = match value {
            Value::Number(number) => match number.as_i64() {
                Some(1) => Some(Self::Ascending),
                Some(-1) => Some(Self::Descending),
                _ => None,
            },
            Value::String(text) => match text.to_ascii_lowercase().as_str() {
                "1" | "asc" | "ascending" => Some(Self::Ascending),
                "-1" | "desc" | "descending" => Some(Self::Descending),
                _ => None,
            },
            _ => None,
        };
        direction.ok_or_else(|| {
            ListQueryError::expression(
                Parameter::Sort,
                format!("`{field}` must be 1, -1, \"asc\" or \"desc\""),
            )
        })
    }
}

/// One field of a [`SortSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Dotted field path.
    pub field: String,
    /// Direction for this field.
    pub direction: SortDirection,
}

/// Ordered list of sort keys; earlier keys take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// Parse the JSON text of a `sort` parameter such as `{"deadline": 1}`.
    ///
    /// # Errors
    /// Returns [`ListQueryError`] when the text is not a JSON object of
    /// field directions.
    pub fn parse(text: &str) -> Result<Self, ListQueryError> {
        let Value::Object(map) = parse_json(Parameter::Sort, text)? else {
            return Err(ListQueryError::expression(
                Parameter::Sort,
                "sort must be a JSON object",
            ));
        };
        let keys = map
            .iter()
            .map(|(field, value)| {
                Ok(SortKey {
                    field: field.clone(),
                    direction: SortDirection::from_json(field, value)?,
                })
            })
            .collect::<Result<Vec<_>, ListQueryError>>()?;
        Ok(Self { keys })
    }

    /// Keys in precedence order.
    #[must_use]
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Whether the specification leaves natural order untouched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Compare two documents under this specification.
    #[must_use]
    pub fn compare(&self, left: &Document, right: &Document) -> Ordering {
        self.keys.iter().fold(Ordering::Equal, |ordering, key| {
            ordering.then_with(|| {
                let natural = total_order(lookup(left, &key.field), lookup(right, &key.field));
                match key.direction {
                    SortDirection::Ascending => natural,
                    SortDirection::Descending => natural.reverse(),
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn docs() -> Vec<Document> {
        [
            json!({"_id": "a", "name": "beta", "priority": 2}),
            json!({"_id": "b", "name": "alpha", "priority": 2}),
            json!({"_id": "c", "name": "gamma", "priority": 1}),
            json!({"_id": "d", "name": "delta"}),
        ]
        .into_iter()
        .filter_map(|value| value.as_object().cloned())
        .collect()
    }

    fn ids(documents: &[Document]) -> Vec<&str> {
        documents
            .iter()
            .filter_map(|doc| doc.get("_id").and_then(Value::as_str))
            .collect()
    }

    #[rstest]
    #[case(r#"{"name": 1}"#, vec!["b", "a", "d", "c"])]
    #[case(r#"{"name": "desc"}"#, vec!["c", "d", "a", "b"])]
    #[case(r#"{"priority": -1, "name": 1}"#, vec!["b", "a", "c", "d"])]
    #[case(r#"{"name": 1, "priority": -1}"#, vec!["b", "a", "d", "c"])]
    #[case(r#"{"priority": 1}"#, vec!["d", "c", "a", "b"])]
    #[case("{}", vec!["a", "b", "c", "d"])]
    fn sort_orders_documents(#[case] text: &str, #[case] expected: Vec<&str>) {
        let spec = SortSpec::parse(text).expect("sort parses");
        let mut documents = docs();
        documents.sort_by(|left, right| spec.compare(left, right));
        assert_eq!(ids(&documents), expected);
    }

    #[rstest]
    #[case("name")]
    #[case(r#"["name"]"#)]
    #[case(r#"{"name": 2}"#)]
    #[case(r#"{"name": true}"#)]
    fn malformed_sorts_are_rejected(#[case] text: &str) {
        let error = SortSpec::parse(text).expect_err("sort should be rejected");
        assert_eq!(error.parameter(), Parameter::Sort);
    }

    #[rstest]
    fn key_order_follows_the_request() {
        let spec = SortSpec::parse(r#"{"zeta": 1, "alpha": -1}"#).expect("sort parses");
        let fields: Vec<&str> = spec.keys().iter().map(|key| key.field.as_str()).collect();
        assert_eq!(fields, ["zeta", "alpha"]);
    }
}
