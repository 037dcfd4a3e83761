//! Find/list/count handlers for the storage worker.

use super::WorkerState;
use crate::backend::{RequestId, StorageEvent};
use quentier_core::db::{ListFilter, ListOrder};
use quentier_core::models::{Entity, EntityKind};
use quentier_core::AppError;
use tracing::error;

pub(super) fn handle_find(
    state: &mut WorkerState,
    request_id: RequestId,
    kind: EntityKind,
    local_id: String,
) {
    match state.db.find(kind, &local_id) {
        Ok(Some(entity)) => state.emit(StorageEvent::Found { request_id, entity }),
        Ok(None) => state.emit(StorageEvent::FindFailed {
            message: format!("Find failed: {} '{}' not found", kind, local_id),
            request_id,
            kind,
            local_id,
        }),
        Err(err) => {
            error!("storage find failed: {}", err);
            state.emit(StorageEvent::FindFailed {
                request_id,
                kind,
                local_id,
                message: format!("Find failed: {}", err),
            });
        }
    }
}

fn list_entities(
    state: &WorkerState,
    kind: EntityKind,
    filter: ListFilter,
    offset: usize,
    limit: usize,
    order: ListOrder,
) -> Result<Vec<Entity>, AppError> {
    let db = &state.db;
    Ok(match kind {
        EntityKind::Note => db
            .notes
            .list(filter, offset, limit, order)?
            .into_iter()
            .map(Entity::from)
            .collect(),
        EntityKind::Notebook => db
            .notebooks
            .list(filter, offset, limit, order)?
            .into_iter()
            .map(Entity::from)
            .collect(),
        EntityKind::Tag => db
            .tags
            .list(filter, offset, limit, order)?
            .into_iter()
            .map(Entity::from)
            .collect(),
        EntityKind::SavedSearch => db
            .saved_searches
            .list(filter, offset, limit, order)?
            .into_iter()
            .map(Entity::from)
            .collect(),
    })
}

/// Returns the number of listed items (zero on failure).
pub(super) fn handle_list(
    state: &mut WorkerState,
    request_id: RequestId,
    kind: EntityKind,
    filter: ListFilter,
    offset: usize,
    limit: usize,
    order: ListOrder,
) -> usize {
    match list_entities(state, kind, filter, offset, limit, order) {
        Ok(items) => {
            let len = items.len();
            state.emit(StorageEvent::Listed {
                request_id,
                kind,
                offset,
                items,
            });
            len
        }
        Err(err) => {
            error!("storage list failed: {}", err);
            state.emit(StorageEvent::ListFailed {
                request_id,
                kind,
                offset,
                message: format!("List failed: {}", err),
            });
            0
        }
    }
}

pub(super) fn handle_count_notes(
    state: &mut WorkerState,
    request_id: RequestId,
    kind: EntityKind,
    local_id: String,
) {
    match state.db.count_notes(kind, &local_id) {
        Ok(count) => state.emit(StorageEvent::NoteCount {
            request_id,
            kind,
            local_id,
            count,
        }),
        Err(err) => {
            error!("storage note count failed: {}", err);
            state.emit(StorageEvent::NoteCountFailed {
                request_id,
                kind,
                local_id,
                message: format!("Note count failed: {}", err),
            });
        }
    }
}
