//! UI-thread models over local storage and the building blocks they share.

/// Bounded LRU caches of full entities.
pub mod cache;
/// Request id -> intent bookkeeping.
pub mod correlator;
/// Favorited entities across every kind.
pub mod favorites;
/// Notifications towards the view.
pub mod observer;
/// Row handles that survive model changes.
pub mod persistent;
/// Ordered rows with a key index.
pub mod table;

pub use cache::{EntityCaches, LruCache, SharedCaches};
pub use correlator::Correlator;
pub use favorites::FavoritesModel;
pub use observer::{CellRange, ModelError, ModelErrorKind, ModelObserver, NoopObserver};
pub use persistent::{PersistentIndex, PersistentIndices};
pub use table::{ItemTable, TableItem};
