//! Request/response protocol between models and the storage worker.

use quentier_core::db::{ExpungeReport, ListFilter, ListOrder};
use quentier_core::models::{Entity, EntityKind};
use std::fmt;
use uuid::Uuid;

/// Opaque id chosen by the requester and echoed back in every event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Commands executed by the storage worker, in the order they are sent.
#[derive(Debug, Clone)]
pub enum StorageCmd {
    /// Insert a new entity.
    Create {
        request_id: RequestId,
        entity: Entity,
    },
    /// Replace an existing entity.
    Update {
        request_id: RequestId,
        entity: Entity,
    },
    /// Load one entity by local id.
    Find {
        request_id: RequestId,
        kind: EntityKind,
        local_id: String,
    },
    /// Load one page of entities of `kind`.
    List {
        request_id: RequestId,
        kind: EntityKind,
        filter: ListFilter,
        offset: usize,
        limit: usize,
        order: ListOrder,
    },
    /// Permanently remove an entity and its dependents.
    Expunge {
        request_id: RequestId,
        kind: EntityKind,
        local_id: String,
    },
    /// Count non-trashed notes in a notebook or with a tag.
    CountNotes {
        request_id: RequestId,
        kind: EntityKind,
        local_id: String,
    },
}

impl StorageCmd {
    pub fn request_id(&self) -> RequestId {
        match self {
            StorageCmd::Create { request_id, .. }
            | StorageCmd::Update { request_id, .. }
            | StorageCmd::Find { request_id, .. }
            | StorageCmd::List { request_id, .. }
            | StorageCmd::Expunge { request_id, .. }
            | StorageCmd::CountNotes { request_id, .. } => *request_id,
        }
    }
}

/// Responses produced by the storage worker.
///
/// `Added`, `Updated` and `Expunged` double as change notifications: a
/// consumer that does not recognize the request id treats them as changes
/// made by someone else.
#[derive(Debug, Clone)]
pub enum StorageEvent {
    Added {
        request_id: RequestId,
        entity: Entity,
    },
    CreateFailed {
        request_id: RequestId,
        entity: Entity,
        message: String,
    },
    Updated {
        request_id: RequestId,
        entity: Entity,
    },
    UpdateFailed {
        request_id: RequestId,
        entity: Entity,
        message: String,
    },
    Found {
        request_id: RequestId,
        entity: Entity,
    },
    FindFailed {
        request_id: RequestId,
        kind: EntityKind,
        local_id: String,
        message: String,
    },
    Listed {
        request_id: RequestId,
        kind: EntityKind,
        offset: usize,
        items: Vec<Entity>,
    },
    ListFailed {
        request_id: RequestId,
        kind: EntityKind,
        offset: usize,
        message: String,
    },
    Expunged {
        request_id: RequestId,
        report: ExpungeReport,
    },
    ExpungeFailed {
        request_id: RequestId,
        kind: EntityKind,
        local_id: String,
        message: String,
    },
    NoteCount {
        request_id: RequestId,
        kind: EntityKind,
        local_id: String,
        count: u32,
    },
    NoteCountFailed {
        request_id: RequestId,
        kind: EntityKind,
        local_id: String,
        message: String,
    },
}

impl StorageEvent {
    pub fn request_id(&self) -> RequestId {
        match self {
            StorageEvent::Added { request_id, .. }
            | StorageEvent::CreateFailed { request_id, .. }
            | StorageEvent::Updated { request_id, .. }
            | StorageEvent::UpdateFailed { request_id, .. }
            | StorageEvent::Found { request_id, .. }
            | StorageEvent::FindFailed { request_id, .. }
            | StorageEvent::Listed { request_id, .. }
            | StorageEvent::ListFailed { request_id, .. }
            | StorageEvent::Expunged { request_id, .. }
            | StorageEvent::ExpungeFailed { request_id, .. }
            | StorageEvent::NoteCount { request_id, .. }
            | StorageEvent::NoteCountFailed { request_id, .. } => *request_id,
        }
    }
}
