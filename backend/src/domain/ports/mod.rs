//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`) are implemented by the domain
//! services and called by inbound adapters. Driven ports
//! ([`DocumentStore`], [`ReferenceSync`]) are implemented by outbound
//! adapters.

mod document_store;
mod reference_sync;
mod task_command;
mod task_query;
mod user_command;
mod user_query;

#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{
    Collection, DocumentStore, GuardedWrite, Patch, PatchOp, StoreError,
};
#[cfg(test)]
pub use reference_sync::MockReferenceSync;
pub use reference_sync::ReferenceSync;
#[cfg(test)]
pub use task_command::MockTaskCommand;
pub use task_command::TaskCommand;
#[cfg(test)]
pub use task_query::MockTaskQuery;
pub use task_query::TaskQuery;
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::UserQuery;
