//! Shared constants used across Quentier crates.

/// Number of entities requested per list page when populating models.
pub const DEFAULT_LIST_PAGE_SIZE: usize = 40;

/// Default per-kind capacity of the shared entity caches.
pub const DEFAULT_ITEM_CACHE_CAPACITY: usize = 100;

/// Directory under the user's cache dir holding the default database.
pub const DEFAULT_DB_DIR_NAME: &str = "quentier";

/// Maximum length of notebook, tag and saved search names.
pub const MAX_NAME_LEN: usize = 100;

/// Maximum length of a note title.
pub const MAX_NOTE_TITLE_LEN: usize = 255;
