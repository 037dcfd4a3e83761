//! Opening local storage and driving the favorites model for one command.

use anyhow::{anyhow, bail, Context, Result};
use quentier_core::db::{StoragePatch, VersionStatus};
use quentier_core::models::{Entity, EntityKind};
use quentier_core::{Config, Database};
use quentier_model::{
    pump_until_idle, spawn_backend_with_perf_log, BackendHandle, Column, EntityCaches, FavoritesModel,
    ModelError, ModelObserver,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing::{debug, info};

/// How long one command waits for the storage worker to answer.
const STORAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Open the database and make sure this build can use it as-is.
///
/// # Errors
/// Fails when the database cannot be opened, was written by a newer build, or
/// still needs patches (see `quentier check-storage --apply`).
pub(crate) fn open_storage(config: &Config) -> Result<Database> {
    let db = Database::new(&config.db_path)
        .with_context(|| format!("open local storage at '{}'", config.db_path))?;
    let (status, patches) = storage_status(&db)?;
    if !patches.is_empty() {
        bail!(
            "local storage is at version {} but this build needs {}; run `quentier check-storage --apply` first",
            status.stored,
            status.supported
        );
    }
    debug!(version = status.stored, "local storage ready");
    Ok(db)
}

/// Version check plus the list of patches still to apply.
pub(crate) fn storage_status(db: &Database) -> Result<(VersionStatus, Vec<StoragePatch>)> {
    let status = db.check_version()?;
    if !status.is_compatible() {
        bail!(
            "local storage was written by a newer Quentier (version {}, supported {})",
            status.stored,
            status.supported
        );
    }
    let patches = db.pending_patches()?;
    Ok((status, patches))
}

/// Look an entity up by local id in every kind.
pub(crate) fn find_any(db: &Database, local_id: &str) -> Result<Entity> {
    for kind in EntityKind::ALL {
        if let Some(entity) = db.find(kind, local_id)? {
            return Ok(entity);
        }
    }
    Err(anyhow!("no notebook, tag, note or saved search with id '{}'", local_id))
}

#[derive(Clone, Default)]
struct ErrorCollector(Rc<RefCell<Vec<ModelError>>>);

impl ModelObserver for ErrorCollector {
    fn error(&mut self, error: &ModelError) {
        self.0.borrow_mut().push(error.clone());
    }
}

/// A loaded favorites model backed by its own storage worker.
pub(crate) struct FavoritesSession {
    backend: BackendHandle,
    model: FavoritesModel,
    errors: ErrorCollector,
}

impl FavoritesSession {
    /// Spawn a worker over `db`, list every favorite and wait for counts.
    pub(crate) fn load(db: &Database, config: &Config) -> Result<Self> {
        let backend = spawn_backend_with_perf_log(db.share(), config.backend_perf_log);
        let mut model = FavoritesModel::new(
            backend.cmd_tx.clone(),
            EntityCaches::shared(config.cache_capacity),
            config.list_page_size,
        );
        let errors = ErrorCollector::default();
        model.set_observer(Box::new(errors.clone()));
        model.start();

        let mut session = Self {
            backend,
            model,
            errors,
        };
        session.settle()?;
        info!(rows = session.model.row_count(), "favorites loaded");
        Ok(session)
    }

    pub(crate) fn model(&self) -> &FavoritesModel {
        &self.model
    }

    pub(crate) fn model_mut(&mut self) -> &mut FavoritesModel {
        &mut self.model
    }

    fn row_of(&self, local_id: &str) -> Result<usize> {
        self.model
            .index_of(local_id)
            .ok_or_else(|| anyhow!("'{}' is not in favorites", local_id))
    }

    /// Rename a favorite and wait until storage has the new name.
    pub(crate) fn rename(&mut self, local_id: &str, name: &str) -> Result<()> {
        let row = self.row_of(local_id)?;
        self.model.set_data(row, Column::DisplayName, name)?;
        self.settle()
    }

    /// Drop a favorite from the list and clear its flag in storage.
    pub(crate) fn unfavorite(&mut self, local_id: &str) -> Result<()> {
        let row = self.row_of(local_id)?;
        self.model.remove_rows(row, 1)?;
        self.settle()
    }

    /// Pump worker events until the model has nothing outstanding, then
    /// surface the first error it reported.
    fn settle(&mut self) -> Result<()> {
        pump_until_idle(&self.backend.evt_rx, &mut self.model, STORAGE_TIMEOUT)?;
        let first = self.errors.0.borrow_mut().drain(..).next();
        match first {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}
