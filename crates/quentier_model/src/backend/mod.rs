//! Storage worker wiring.
//!
//! This module exposes the command/event protocol plus the worker spawn helper
//! used by models on the UI thread.

mod protocol;
mod worker;

pub use protocol::{RequestId, StorageCmd, StorageEvent};
pub use worker::{spawn_backend, spawn_backend_with_perf_log, BackendHandle};
