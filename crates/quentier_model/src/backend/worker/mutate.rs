//! Create/update/expunge handlers for the storage worker.

use super::WorkerState;
use crate::backend::{RequestId, StorageEvent};
use quentier_core::models::{Entity, EntityKind};
use quentier_core::AppError;
use tracing::{debug, error, warn};

fn log_rejection(action: &str, err: &AppError) {
    if err.is_user_error() {
        debug!("storage {} rejected: {}", action, err);
    } else {
        warn!("storage {} failed: {}", action, err);
    }
}

pub(super) fn handle_create(state: &mut WorkerState, request_id: RequestId, entity: Entity) {
    match state.db.create(entity.clone()) {
        Ok(entity) => state.emit(StorageEvent::Added { request_id, entity }),
        Err(err) => {
            log_rejection("create", &err);
            state.emit(StorageEvent::CreateFailed {
                request_id,
                entity,
                message: format!("Create failed: {}", err),
            });
        }
    }
}

pub(super) fn handle_update(state: &mut WorkerState, request_id: RequestId, entity: Entity) {
    match state.db.update(entity.clone()) {
        Ok(Some(entity)) => state.emit(StorageEvent::Updated { request_id, entity }),
        Ok(None) => state.emit(StorageEvent::UpdateFailed {
            message: format!(
                "Update failed: {} '{}' not found",
                entity.kind(),
                entity.local_id()
            ),
            request_id,
            entity,
        }),
        Err(err) => {
            log_rejection("update", &err);
            state.emit(StorageEvent::UpdateFailed {
                request_id,
                entity,
                message: format!("Update failed: {}", err),
            });
        }
    }
}

pub(super) fn handle_expunge(
    state: &mut WorkerState,
    request_id: RequestId,
    kind: EntityKind,
    local_id: String,
) {
    match state.db.expunge(kind, &local_id) {
        Ok(Some(report)) => state.emit(StorageEvent::Expunged { request_id, report }),
        Ok(None) => state.emit(StorageEvent::ExpungeFailed {
            message: format!("Expunge failed: {} '{}' not found", kind, local_id),
            request_id,
            kind,
            local_id,
        }),
        Err(err) => {
            error!("storage expunge failed: {}", err);
            state.emit(StorageEvent::ExpungeFailed {
                request_id,
                kind,
                local_id,
                message: format!("Expunge failed: {}", err),
            });
        }
    }
}
