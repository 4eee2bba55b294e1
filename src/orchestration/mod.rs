//! Orchestration of the reconcile-and-commit flow.

pub mod sync;

pub use sync::{HoldingSyncer, SyncError, SyncReport};
