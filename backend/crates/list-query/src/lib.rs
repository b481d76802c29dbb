//! Typed list-query primitives shared by Taskboard list endpoints.
//!
//! Clients send list parameters (`where`, `sort`, `select`, `skip`, `limit`,
//! `count`) as query-string values whose structured parts are JSON text. This
//! crate parses them into store-agnostic types ([`Filter`], [`SortSpec`],
//! [`Projection`], [`ListQuery`]) so that the domain never handles a store's
//! native expression grammar. The same types carry the evaluation semantics
//! used by in-process document stores.
//!
//! # Examples
//! ```
//! use list_query::{ListParams, ListQuery};
//!
//! let params = ListParams {
//!     filter: Some(r#"{"completed": false}"#.to_owned()),
//!     sort: Some(r#"{"deadline": 1}"#.to_owned()),
//!     limit: Some("10".to_owned()),
//!     ..ListParams::default()
//! };
//! let query = ListQuery::from_params(&params, 100).expect("well-formed query");
//! assert_eq!(query.limit, Some(10));
//! assert!(!query.count);
//! ```

mod error;
mod filter;
mod projection;
mod query;
mod sort;
mod value;

pub use error::{ListQueryError, Parameter};
pub use filter::{Condition, Filter};
pub use projection::{ID_FIELD, Projection};
pub use query::{ListParams, ListQuery};
pub use sort::{SortDirection, SortKey, SortSpec};

/// JSON object representation of a stored document.
pub type Document = serde_json::Map<String, serde_json::Value>;
