//! Value lookup and ordering rules shared by filters and sorts.

use std::cmp::Ordering;

use serde_json::Value;

use crate::Document;

/// Resolve a dotted `path` against `document`.
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let head = segments.next()?;
    segments.try_fold(document.get(head)?, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        _ => None,
    })
}

/// Equality with numeric normalisation, so `1` equals `1.0`.
pub(crate) fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => {
            compare_same_kind(left, right) == Some(Ordering::Equal)
        }
        _ => left == right,
    }
}

/// Compare two values of the same kind. Mixed kinds are incomparable.
pub(crate) fn compare_same_kind(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Number(a), Value::Number(b)) => {
            if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
                return Some(x.cmp(&y));
            }
            if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
                return Some(x.cmp(&y));
            }
            a.as_f64()?.partial_cmp(&b.as_f64()?)
        }
        _ => None,
    }
}

const fn kind_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Object(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Bool(_)) => 5,
    }
}

/// Total order used for sorting: kinds first, then values within a kind.
pub(crate) fn total_order(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    kind_rank(left).cmp(&kind_rank(right)).then_with(|| match (left, right) {
        (Some(a), Some(b)) => compare_same_kind(a, b).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    })
}
