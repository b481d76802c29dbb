//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{TaskCommand, TaskQuery, UserCommand, UserQuery};

/// Page sizes applied when a list request has no `limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListDefaults {
    /// Default for `GET /api/tasks`.
    pub tasks: u64,
    /// Default for `GET /api/users`; `0` is unlimited.
    pub users: u64,
}

impl Default for ListDefaults {
    fn default() -> Self {
        Self {
            tasks: 100,
            users: 0,
        }
    }
}

/// Parameter object bundling the driving ports used by HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Task reads.
    pub task_query: Arc<dyn TaskQuery>,
    /// Task writes.
    pub task_command: Arc<dyn TaskCommand>,
    /// User reads.
    pub user_query: Arc<dyn UserQuery>,
    /// User writes.
    pub user_command: Arc<dyn UserCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Task reads.
    pub task_query: Arc<dyn TaskQuery>,
    /// Task writes.
    pub task_command: Arc<dyn TaskCommand>,
    /// User reads.
    pub user_query: Arc<dyn UserQuery>,
    /// User writes.
    pub user_command: Arc<dyn UserCommand>,
    /// List page sizes.
    pub list_defaults: ListDefaults,
}

impl HttpState {
    /// Construct state from port implementations and list defaults.
    pub fn new(ports: HttpStatePorts, list_defaults: ListDefaults) -> Self {
        let HttpStatePorts {
            task_query,
            task_command,
            user_query,
            user_command,
        } = ports;
        Self {
            task_query,
            task_command,
            user_query,
            user_command,
            list_defaults,
        }
    }
}
