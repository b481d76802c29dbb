//! Filter predicates over document fields.
//!
//! The wire form follows the familiar document-store grammar:
//!
//! ```text
//! {"completed": false}
//! {"deadline": {"$lt": "2025-01-01T00:00:00Z"}, "assignedUser": {"$ne": ""}}
//! {"$or": [{"name": "Write report"}, {"_id": {"$in": ["a", "b"]}}]}
//! ```
//!
//! Keys in one object combine as a conjunction; dotted keys address nested
//! fields.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::Document;
use crate::error::{ListQueryError, Parameter, parse_json};
use crate::value::{compare_same_kind, lookup, values_equal};

/// Comparison applied to a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the operand, or is an array containing it.
    Eq(Value),
    /// Negation of [`Condition::Eq`].
    Ne(Value),
    /// Field is strictly greater than the operand.
    Gt(Value),
    /// Field is greater than or equal to the operand.
    Gte(Value),
    /// Field is strictly less than the operand.
    Lt(Value),
    /// Field is less than or equal to the operand.
    Lte(Value),
    /// Field equals any operand.
    In(Vec<Value>),
    /// Field equals none of the operands.
    Nin(Vec<Value>),
    /// Field presence matches the flag.
    Exists(bool),
}

impl Condition {
    fn parse(operator: &str, operand: &Value) -> Result<Self, ListQueryError> {
        let condition = match operator {
            "$eq" => Self::Eq(operand.clone()),
            "$ne" => Self::Ne(operand.clone()),
            "$gt" => Self::Gt(operand.clone()),
            "$gte" => Self::Gte(operand.clone()),
            "$lt" => Self::Lt(operand.clone()),
            "$lte" => Self::Lte(operand.clone()),
            "$in" => Self::In(operand_list(operator, operand)?),
            "$nin" => Self::Nin(operand_list(operator, operand)?),
            "$exists" => Self::Exists(match operand {
                Value::Bool(flag) => *flag,
                Value::Number(number) => number.as_i64() != Some(0),
                _ => {
                    return Err(ListQueryError::expression(
                        Parameter::Where,
                        "$exists expects a boolean",
                    ));
                }
            }),
            other => {
                return Err(ListQueryError::expression(
                    Parameter::Where,
                    format!("unsupported operator `{other}`"),
                ));
            }
        };
        Ok(condition)
    }

    /// Evaluate the condition against a field value (`None` when absent).
    #[must_use]
    pub fn test(&self, value: Option<&Value>) -> bool {
        match self {
            Self::Eq(operand) => equals(value, operand),
            Self::Ne(operand) => !equals(value, operand),
            Self::Gt(operand) => ranges(value, operand, Ordering::is_gt),
            Self::Gte(operand) => ranges(value, operand, Ordering::is_ge),
            Self::Lt(operand) => ranges(value, operand, Ordering::is_lt),
            Self::Lte(operand) => ranges(value, operand, Ordering::is_le),
            Self::In(operands) => operands.iter().any(|operand| equals(value, operand)),
            Self::Nin(operands) => !operands.iter().any(|operand| equals(value, operand)),
            Self::Exists(flag) => value.is_some() == *flag,
        }
    }
}

fn operand_list(operator: &str, operand: &Value) -> Result<Vec<Value>, ListQueryError> {
    match operand {
        Value::Array(items) => Ok(items.clone()),
        _ => Err(ListQueryError::expression(
            Parameter::Where,
            format!("{operator} expects an array"),
        )),
    }
}

fn equals(value: Option<&Value>, operand: &Value) -> bool {
    match value {
        None => operand.is_null(),
        Some(Value::Array(items)) if !operand.is_array() => {
            items.iter().any(|item| values_equal(item, operand))
        }
        Some(found) => values_equal(found, operand),
    }
}

fn ranges(value: Option<&Value>, operand: &Value, accept: fn(Ordering) -> bool) -> bool {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| compare_same_kind(item, operand).is_some_and(accept)),
        Some(found) => compare_same_kind(found, operand).is_some_and(accept),
        None => false,
    }
}

/// Boolean predicate over documents.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Matches every document.
    #[default]
    All,
    /// Matches when every clause matches.
    And(Vec<Filter>),
    /// Matches when any clause matches.
    Or(Vec<Filter>),
    /// Matches when no clause matches.
    Nor(Vec<Filter>),
    /// Matches when the field satisfies the condition.
    Field {
        /// Dotted field path.
        path: String,
        /// Condition applied to the field.
        condition: Condition,
    },
}

impl Filter {
    /// Build a single-field predicate.
    ///
    /// # Examples
    /// ```
    /// use list_query::{Condition, Filter};
    /// use serde_json::json;
    ///
    /// let filter = Filter::field("email", Condition::Eq(json!("ada@example.com")));
    /// let doc = json!({"email": "ada@example.com"});
    /// assert!(filter.matches(doc.as_object().expect("object")));
    /// ```
    pub fn field(path: impl Into<String>, condition: Condition) -> Self {
        Self::Field {
            path: path.into(),
            condition,
        }
    }

    /// Shorthand for an equality predicate.
    pub fn equals(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::field(path, Condition::Eq(value.into()))
    }

    /// Parse the JSON text of a `where` parameter.
    ///
    /// # Errors
    /// Returns [`ListQueryError`] when the text is not JSON, not an object, or
    /// uses an unsupported operator.
    pub fn parse(text: &str) -> Result<Self, ListQueryError> {
        Self::from_json(&parse_json(Parameter::Where, text)?)
    }

    /// Build a filter from an already decoded JSON expression.
    ///
    /// # Errors
    /// Returns [`ListQueryError::InvalidExpression`] for anything that is not
    /// a filter object.
    pub fn from_json(expression: &Value) -> Result<Self, ListQueryError> {
        match expression {
            Value::Object(map) => Self::from_object(map),
            _ => Err(ListQueryError::expression(
                Parameter::Where,
                "filter must be a JSON object",
            )),
        }
    }

    fn from_object(map: &Map<String, Value>) -> Result<Self, ListQueryError> {
        let mut clauses = Vec::with_capacity(map.len());
        for (key, operand) in map {
            if let Some(operator) = key.strip_prefix('$') {
                clauses.push(Self::logical(operator, operand)?);
            } else {
                clauses.extend(Self::field_clauses(key, operand)?);
            }
        }
        Ok(match clauses.len() {
            0 => Self::All,
            1 => clauses.pop().unwrap_or_default(),
            _ => Self::And(clauses),
        })
    }

    fn logical(operator: &str, operand: &Value) -> Result<Self, ListQueryError> {
        let Value::Array(items) = operand else {
            return Err(ListQueryError::expression(
                Parameter::Where,
                format!("${operator} expects an array of filters"),
            ));
        };
        if items.is_empty() {
            return Err(ListQueryError::expression(
                Parameter::Where,
                format!("${operator} expects at least one filter"),
            ));
        }
        let clauses = items
            .iter()
            .map(Self::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        match operator {
            "and" => Ok(Self::And(clauses)),
            "or" => Ok(Self::Or(clauses)),
            "nor" => Ok(Self::Nor(clauses)),
            other => Err(ListQueryError::expression(
                Parameter::Where,
                format!("unsupported operator `${other}`"),
            )),
        }
    }

    fn field_clauses(path: &str, operand: &Value) -> Result<Vec<Self>, ListQueryError> {
        let operators = match operand {
            Value::Object(map) if map.keys().any(|key| key.starts_with('$')) => map,
            _ => return Ok(vec![Self::equals(path, operand.clone())]),
        };
        if operators.keys().any(|key| !key.starts_with('$')) {
            return Err(ListQueryError::expression(
                Parameter::Where,
                format!("`{path}` mixes operators and literal fields"),
            ));
        }
        operators
            .iter()
            .map(|(operator, value)| Ok(Self::field(path, Condition::parse(operator, value)?)))
            .collect()
    }

    /// Evaluate the predicate against a document.
    #[must_use]
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Self::All => true,
            Self::And(clauses) => clauses.iter().all(|clause| clause.matches(document)),
            Self::Or(clauses) => clauses.iter().any(|clause| clause.matches(document)),
            Self::Nor(clauses) => !clauses.iter().any(|clause| clause.matches(document)),
            Self::Field { path, condition } => condition.test(lookup(document, path)),
        }
    }
}
