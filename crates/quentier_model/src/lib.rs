//! Storage worker and UI-thread models for Quentier.

/// Storage worker thread and its command/event protocol.
pub mod backend;
/// Pumping worker events into models without a GUI loop.
pub mod driver;
/// Models, caches and the view contract.
pub mod model;

pub use backend::{
    spawn_backend, spawn_backend_with_perf_log, BackendHandle, RequestId, StorageCmd, StorageEvent,
};
pub use driver::{drain_ready, pump_until_idle, DriverError, EventSink};
pub use model::favorites::{CellValue, Column, FavoritesItem, ItemFlags, SortOrder};
pub use model::{
    EntityCaches, FavoritesModel, ModelError, ModelErrorKind, ModelObserver, PersistentIndex,
    SharedCaches,
};
