//! Core domain library for Quentier (entities, validation, local storage).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Local storage layer backed by redb.
pub mod db;
/// Process-global environment helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Notes, notebooks, tags and saved searches.
pub mod models;
/// Name and title validation rules.
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use constants::{DEFAULT_ITEM_CACHE_CAPACITY, DEFAULT_LIST_PAGE_SIZE};
pub use db::Database;
pub use error::AppError;
pub use models::{Entity, EntityKind};
