//! Domain entities, services and ports.
//!
//! Purpose: define the task and user documents, the services that create,
//! replace and delete them, and the reference-sync protocol keeping
//! `Task.assignedUser` and `User.pendingTasks` consistent. Transport and
//! persistence concerns live behind the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Task / TaskDraft / TaskInput and User / UserDraft / UserInput: entities
//!   and their validated inputs.
//! - TaskService / UserService: implementations of the driving ports.
//! - SyncBatch / SyncCommand / ReferenceSyncExecutor: reference sync.
//! - TraceId: request-scoped correlation identifier.

mod document;
pub mod error;
mod ids;
mod listing;
pub mod ports;
pub mod reference_sync;
mod task;
mod task_service;
mod timestamp;
pub mod trace_id;
mod user;
mod user_service;

pub use self::document::{DocumentError, from_document, to_document};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{IdValidationError, TaskId, UserId};
pub use self::listing::Listing;
pub use self::reference_sync::{
    CommandOutcome, ReferenceSyncExecutor, SyncBatch, SyncCommand, SyncReport,
};
pub use self::task::{
    Task, TaskDraft, TaskInput, TaskValidationError, UNASSIGNED_NAME, parse_deadline,
};
pub use self::task_service::TaskService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserDraft, UserInput, UserValidationError};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use taskboard::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("missing"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
