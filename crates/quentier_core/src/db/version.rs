//! Schema version tracking and the patches that upgrade older databases.

use super::{tables::*, Database};
use crate::error::AppError;
use crate::models::Note;
use redb::{ReadableDatabase, ReadableTable};
use tracing::info;

/// Schema version written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Version assumed for databases that predate the `meta` table.
const LEGACY_SCHEMA_VERSION: u32 = 1;

/// Outcome of comparing the stored schema version with this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionStatus {
    pub stored: u32,
    pub supported: u32,
}

impl VersionStatus {
    /// A database from a newer build cannot be opened safely.
    pub fn is_compatible(&self) -> bool {
        self.stored <= self.supported
    }

    pub fn needs_upgrade(&self) -> bool {
        self.stored < self.supported
    }
}

/// One upgrade step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoragePatch {
    /// 1 -> 2: build `notes_by_notebook` from the notes table.
    BackfillNotebookIndex,
}

impl StoragePatch {
    fn for_version(from: u32) -> Option<Self> {
        match from {
            1 => Some(StoragePatch::BackfillNotebookIndex),
            _ => None,
        }
    }

    pub fn from_version(self) -> u32 {
        match self {
            StoragePatch::BackfillNotebookIndex => 1,
        }
    }

    pub fn to_version(self) -> u32 {
        self.from_version() + 1
    }

    pub fn description(self) -> &'static str {
        match self {
            StoragePatch::BackfillNotebookIndex => "index notes by notebook",
        }
    }

    fn apply(self, db: &Database) -> Result<(), AppError> {
        match self {
            StoragePatch::BackfillNotebookIndex => backfill_notebook_index(db),
        }
    }
}

fn backfill_notebook_index(db: &Database) -> Result<(), AppError> {
    let write_txn = db.db.begin_write()?;
    let indexed = {
        let notes = write_txn.open_table(NOTES)?;
        let mut index = write_txn.open_table(NOTES_BY_NOTEBOOK)?;
        let mut indexed = 0usize;
        for item in notes.iter()? {
            let (_, value) = item?;
            let note: Note = bincode::deserialize(value.value())?;
            index.insert(
                (note.notebook_local_id.as_str(), note.local_id.as_str()),
                (),
            )?;
            indexed += 1;
        }
        let mut meta = write_txn.open_table(META)?;
        meta.insert(SCHEMA_VERSION_KEY, 2u32)?;
        indexed
    };
    write_txn.commit()?;
    info!(notes = indexed, "backfilled notebook index");
    Ok(())
}

impl Database {
    /// Compare the stored schema version with [`CURRENT_SCHEMA_VERSION`].
    ///
    /// # Errors
    /// Returns an error when the meta table cannot be read.
    pub fn check_version(&self) -> Result<VersionStatus, AppError> {
        let read_txn = self.db.begin_read()?;
        let meta = read_txn.open_table(META)?;
        let stored = meta
            .get(SCHEMA_VERSION_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(LEGACY_SCHEMA_VERSION);
        Ok(VersionStatus {
            stored,
            supported: CURRENT_SCHEMA_VERSION,
        })
    }

    /// Patches needed to bring this database to the current version, in order.
    ///
    /// # Errors
    /// Returns [`AppError::IncompatibleStorage`] for databases written by a
    /// newer build, or a storage error when the version cannot be read.
    pub fn pending_patches(&self) -> Result<Vec<StoragePatch>, AppError> {
        let status = self.check_version()?;
        if !status.is_compatible() {
            return Err(AppError::IncompatibleStorage {
                stored: status.stored,
                supported: status.supported,
            });
        }
        Ok((status.stored..status.supported)
            .filter_map(StoragePatch::for_version)
            .collect())
    }

    /// Apply every pending patch.
    ///
    /// # Returns
    /// The patches that were applied.
    ///
    /// # Errors
    /// Propagates the first failing patch; earlier patches stay committed.
    pub fn apply_pending_patches(&self) -> Result<Vec<StoragePatch>, AppError> {
        let patches = self.pending_patches()?;
        for patch in &patches {
            info!(
                from = patch.from_version(),
                to = patch.to_version(),
                "applying storage patch: {}",
                patch.description()
            );
            patch.apply(self)?;
        }
        Ok(patches)
    }
}
