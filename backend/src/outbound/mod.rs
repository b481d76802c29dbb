//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local document store for tasks and users
//! - **sync**: channel-backed reference sync drained by a background worker
//!
//! Adapters are thin translators between domain types and their backing
//! representation. They contain no business logic.

pub mod memory;
pub mod sync;

pub use memory::InMemoryDocumentStore;
pub use sync::{ChannelReferenceSync, ReferenceSyncWorker, reference_sync_channel};
