//! Local storage layer for Quentier backed by redb.

/// Create/update/expunge operations that span several tables.
pub mod mutations;
/// Generic per-kind row access.
pub mod store;
/// redb table definitions.
pub mod tables;
/// Schema version and storage patches.
pub mod version;

#[cfg(test)]
mod tests;

use crate::error::AppError;
use crate::models::{Note, Notebook, SavedSearch, Tag};
use std::path::Path;
use std::sync::Arc;
use tables::*;

pub use mutations::ExpungeReport;
pub use store::{EntityStore, ListFilter, ListOrder, StoredEntity};
pub use version::{StoragePatch, VersionStatus, CURRENT_SCHEMA_VERSION};

/// Database handle with typed accessors for each entity table.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub notes: EntityStore<Note>,
    pub notebooks: EntityStore<Notebook>,
    pub tags: EntityStore<Tag>,
    pub saved_searches: EntityStore<SavedSearch>,
}

impl Database {
    /// Build a database handle from an existing shared redb instance.
    ///
    /// # Returns
    /// A new [`Database`] wrapper that shares the underlying redb instance.
    pub fn from_shared(db: Arc<redb::Database>) -> Self {
        Self {
            notes: EntityStore::new(db.clone()),
            notebooks: EntityStore::new(db.clone()),
            tags: EntityStore::new(db.clone()),
            saved_searches: EntityStore::new(db.clone()),
            db,
        }
    }

    /// Clone this handle for another subsystem in the same process.
    ///
    /// redb holds an exclusive file lock, so a second `open` of the same path
    /// would fail; sharing the instance avoids that.
    pub fn share(&self) -> Self {
        Self::from_shared(self.db.clone())
    }

    /// Open (or create) the database stored under the directory `path`.
    ///
    /// A freshly created database is stamped with [`CURRENT_SCHEMA_VERSION`].
    /// Existing databases are left untouched; run [`Database::check_version`]
    /// and [`Database::apply_pending_patches`] before serving requests.
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created, the file is
    /// locked by another process, or table initialization fails.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;
        let file = dir.join(REDB_FILE_NAME);
        let fresh = !file.exists();

        let db = match redb::Database::create(&file) {
            Ok(db) => Arc::new(db),
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(AppError::StorageMessage(format!(
                    "Database at '{}' is already open in another Quentier process.\n\
                     Close it first, or set QUENTIER_DB_PATH to use a different location.",
                    dir.display()
                )));
            }
            Err(err) => return Err(err.into()),
        };

        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(NOTES)?;
            write_txn.open_table(NOTEBOOKS)?;
            write_txn.open_table(TAGS)?;
            write_txn.open_table(SAVED_SEARCHES)?;
            write_txn.open_table(NOTES_BY_NOTEBOOK)?;
            let mut meta = write_txn.open_table(META)?;
            if fresh {
                meta.insert(SCHEMA_VERSION_KEY, CURRENT_SCHEMA_VERSION)?;
            }
        }
        write_txn.commit()?;

        if fresh {
            tracing::info!(path = %file.display(), "created local storage");
        }
        Ok(Self::from_shared(db))
    }
}
