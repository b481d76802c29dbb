//! Field projections applied to returned documents.

use serde_json::Value;

use crate::Document;
use crate::error::{ListQueryError, Parameter, parse_json};

/// Identifier field, retained by projections unless explicitly excluded.
pub const ID_FIELD: &str = "_id";

/// Top-level field selection.
///
/// Inclusion and exclusion cannot be mixed, except that an inclusion may drop
/// [`ID_FIELD`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// Keep only the listed fields.
    Include {
        /// Fields to keep, excluding the identifier.
        fields: Vec<String>,
        /// Whether the identifier is kept.
        include_id: bool,
    },
    /// Drop the listed fields.
    Exclude {
        /// Fields to drop.
        fields: Vec<String>,
    },
}

fn flag(field: &str, value: &Value) -> Result<bool, ListQueryError> {
    match value {
        Value::Bool(flag) => Ok(*flag),
        Value::Number(number) => match number.as_i64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(invalid_flag(field)),
        },
        _ => Err(invalid_flag(field)),
    }
}

fn invalid_flag(field: &str) -> ListQueryError {
    ListQueryError::expression(Parameter::Select, format!("`{field}` must be 0, 1 or a boolean"))
}

impl Projection {
    /// Parse the JSON text of a `select` parameter such as `{"name": 1}`.
    ///
    /// # Errors
    /// Returns [`ListQueryError`] for non-object input, non-flag values, or a
    /// mix of inclusions and exclusions.
    ///
    /// # Examples
    /// ```
    /// use list_query::Projection;
    /// use serde_json::json;
    ///
    /// let projection = Projection::parse(r#"{"name": 1}"#).expect("valid projection");
    /// let doc = json!({"_id": "u1", "name": "Ada", "email": "ada@example.com"});
    /// let projected = projection.apply(doc.as_object().cloned().expect("object"));
    /// assert_eq!(serde_json::Value::Object(projected), json!({"_id": "u1", "name": "Ada"}));
    /// ```
    pub fn parse(text: &str) -> Result<Self, ListQueryError> {
        let Value::Object(map) = parse_json(Parameter::Select, text)? else {
            return Err(ListQueryError::expression(
                Parameter::Select,
                "select must be a JSON object",
            ));
        };

        let mut included = Vec::new();
        let mut excluded = Vec::new();
        let mut id_flag = None;
        for (field, value) in &map {
            let keep = flag(field, value)?;
            if field == ID_FIELD {
                id_flag = Some(keep);
            } else if keep {
                included.push(field.clone());
            } else {
                excluded.push(field.clone());
            }
        }

        if !included.is_empty() && !excluded.is_empty() {
            return Err(ListQueryError::expression(
                Parameter::Select,
                "cannot mix inclusion and exclusion",
            ));
        }
        if !included.is_empty() || (excluded.is_empty() && id_flag == Some(true)) {
            return Ok(Self::Include {
                fields: included,
                include_id: id_flag.unwrap_or(true),
            });
        }
        if id_flag == Some(false) {
            excluded.push(ID_FIELD.to_owned());
        }
        Ok(Self::Exclude { fields: excluded })
    }

    /// Apply the projection, preserving the document's field order.
    #[must_use]
    pub fn apply(&self, document: Document) -> Document {
        document
            .into_iter()
            .filter(|(field, _)| self.keeps(field))
            .collect()
    }

    fn keeps(&self, field: &str) -> bool {
        match self {
            Self::Include { fields, include_id } => {
                if field == ID_FIELD {
                    *include_id
                } else {
                    fields.iter().any(|kept| kept == field)
                }
            }
            Self::Exclude { fields } => !fields.iter().any(|dropped| dropped == field),
        }
    }
}
