//! Test utilities for the taskboard crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and with the `test-support` feature.

mod clock;
mod reference_sync;

pub use clock::MutableClock;
pub use reference_sync::RecordingReferenceSync;
