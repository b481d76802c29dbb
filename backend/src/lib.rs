//! Taskboard backend library.
//!
//! A REST API over two document collections, tasks and users, that keeps
//! `Task.assignedUser` and `User.pendingTasks` pointing at each other.
//! Layout follows ports and adapters: [`domain`] owns the rules, [`inbound`]
//! and [`outbound`] translate to HTTP and storage.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
