//! Storage responses and change notifications.

use super::indices::NoteLinks;
use super::{is_favorite_row, FavoritesItem, FavoritesModel, Intent};
use crate::backend::StorageEvent;
use crate::model::ModelError;
use quentier_core::db::ExpungeReport;
use quentier_core::models::{Entity, EntityKind};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Where an entity snapshot came from; decides which note counts go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Listed,
    Added,
    ExternalUpdate,
    Restored,
}

fn link_ids(links: &NoteLinks) -> impl Iterator<Item = &str> {
    std::iter::once(links.notebook_local_id.as_str())
        .chain(links.tag_local_ids.iter().map(String::as_str))
}

impl FavoritesModel {
    /// Apply one event from the storage worker.
    ///
    /// Responses to requests this model did not send (or already consumed)
    /// are ignored, except that added/updated/expunged notifications are
    /// applied as changes made elsewhere.
    pub fn apply_event(&mut self, event: StorageEvent) {
        match event {
            StorageEvent::Added { request_id, entity } => {
                self.pending.resolve(request_id);
                self.apply_entity(entity, Origin::Added);
            }
            StorageEvent::Updated { request_id, entity } => {
                match self.pending.resolve(request_id) {
                    Some(Intent::Update { .. }) => self.confirm_update(entity),
                    Some(other) => self.unexpected_response(other, "updated"),
                    None => self.apply_entity(entity, Origin::ExternalUpdate),
                }
            }
            StorageEvent::UpdateFailed {
                request_id,
                entity,
                message,
            } => match self.pending.resolve(request_id) {
                Some(Intent::Update { kind, local_id }) => {
                    self.report(ModelError::backend(message));
                    self.caches.borrow_mut().remove(kind, &local_id);
                    self.request_find(
                        Intent::FindToRestoreFailedUpdate {
                            kind,
                            local_id: local_id.clone(),
                        },
                        kind,
                        &local_id,
                    );
                }
                Some(other) => self.unexpected_response(other, "update failed"),
                None => debug!(
                    "ignoring update failure for {} '{}'",
                    entity.kind(),
                    entity.local_id()
                ),
            },
            StorageEvent::Found { request_id, entity } => {
                match self.pending.resolve(request_id) {
                    Some(Intent::FindToPerformUpdate { name, .. }) => {
                        self.perform_update(entity, name)
                    }
                    Some(Intent::FindToUnfavorite { .. }) => self.perform_unfavorite(entity),
                    Some(Intent::FindToRestoreFailedUpdate { .. }) => {
                        self.apply_entity(entity, Origin::Restored)
                    }
                    Some(other) => self.unexpected_response(other, "found"),
                    None => {}
                }
            }
            StorageEvent::FindFailed {
                request_id,
                message,
                ..
            } => match self.pending.resolve(request_id) {
                Some(
                    Intent::FindToPerformUpdate { .. }
                    | Intent::FindToUnfavorite { .. }
                    | Intent::FindToRestoreFailedUpdate { .. },
                ) => self.report(ModelError::backend(message)),
                Some(other) => self.unexpected_response(other, "find failed"),
                None => {}
            },
            StorageEvent::Listed {
                request_id,
                kind,
                offset,
                items,
            } => match self.pending.resolve(request_id) {
                Some(Intent::ListPage { .. }) => self.apply_page(kind, offset, items),
                Some(other) => self.unexpected_response(other, "listed"),
                None => {}
            },
            StorageEvent::ListFailed {
                request_id,
                message,
                ..
            } => match self.pending.resolve(request_id) {
                Some(Intent::ListPage { .. }) => {
                    self.list_failed = true;
                    self.report(ModelError::backend(message));
                }
                Some(other) => self.unexpected_response(other, "list failed"),
                None => {}
            },
            StorageEvent::NoteCount {
                request_id,
                local_id,
                count,
                ..
            } => match self.pending.resolve(request_id) {
                Some(Intent::CountNotes { .. }) => self.set_note_count(&local_id, count),
                Some(other) => self.unexpected_response(other, "note count"),
                None => {}
            },
            StorageEvent::NoteCountFailed {
                request_id,
                message,
                ..
            } => match self.pending.resolve(request_id) {
                Some(Intent::CountNotes { .. }) => self.report(ModelError::backend(message)),
                Some(other) => self.unexpected_response(other, "note count failed"),
                None => {}
            },
            StorageEvent::Expunged { request_id, report } => {
                self.pending.resolve(request_id);
                self.apply_expunge(report);
            }
            StorageEvent::CreateFailed { request_id, .. }
            | StorageEvent::ExpungeFailed { request_id, .. } => {
                if let Some(other) = self.pending.resolve(request_id) {
                    self.unexpected_response(other, "create/expunge failed");
                }
            }
        }
    }

    fn unexpected_response(&mut self, intent: Intent, event: &str) {
        self.report(ModelError::internal(format!(
            "'{}' response arrived for a {} request",
            event,
            intent.label()
        )));
    }

    /// Upsert or drop the row for `entity` and refresh affected counts.
    fn apply_entity(&mut self, entity: Entity, origin: Origin) {
        self.caches.borrow_mut().put(entity.clone());
        let previous_links = self.indices.observe(&entity);

        if let Entity::Note(note) = &entity {
            match (origin, previous_links) {
                (Origin::Added, _) => self.recount_links(
                    std::iter::once(note.notebook_local_id.as_str())
                        .chain(note.tag_local_ids.iter().map(String::as_str)),
                ),
                (Origin::ExternalUpdate, Some(previous)) => {
                    let affected: BTreeSet<&str> = link_ids(&previous)
                        .chain(std::iter::once(note.notebook_local_id.as_str()))
                        .chain(note.tag_local_ids.iter().map(String::as_str))
                        .collect();
                    self.recount_links(affected);
                }
                (Origin::ExternalUpdate, None) => self.recount_all(),
                (Origin::Listed | Origin::Restored, _) => {}
            }
        }

        let kind = entity.kind();
        let local_id = entity.local_id();
        if !is_favorite_row(&entity) {
            if self.remove_row(local_id).is_some() {
                debug!("{} '{}' left favorites", kind, local_id);
            }
            self.indices.release(kind, local_id);
            return;
        }

        if let Some(existing) = self.table.get(local_id) {
            if existing.display_name != entity.display_name() {
                let mut renamed = existing.clone();
                renamed.display_name = entity.display_name().to_string();
                self.update_row(renamed);
            }
            return;
        }

        self.insert_row(FavoritesItem::from_entity(&entity));
        if kind.has_note_count() {
            self.request_note_count(kind, local_id);
        }
    }

    /// Our own update was stored. The row already shows the edit.
    fn confirm_update(&mut self, entity: Entity) {
        let superseded = self.pending.any(|intent| {
            matches!(intent, Intent::Update { local_id, .. } if local_id == entity.local_id())
        });
        if !superseded {
            self.caches.borrow_mut().put(entity.clone());
        }
        self.indices.observe(&entity);
        if !is_favorite_row(&entity) {
            self.remove_row(entity.local_id());
            self.indices.release(entity.kind(), entity.local_id());
        }
    }

    /// Send a rename that waited for its entity to be fetched.
    ///
    /// The rename goes out even if the row has left the table meanwhile; a
    /// later unfavorite of the same entity builds on it.
    fn perform_update(&mut self, found: Entity, name: String) {
        if self.table.contains(found.local_id()) {
            self.indices.observe(&found);
        }
        let mut entity = self.latest_snapshot(found);
        entity.set_display_name(name);
        self.write_through(entity);
    }

    fn perform_unfavorite(&mut self, found: Entity) {
        let mut entity = self.latest_snapshot(found);
        self.indices.release(entity.kind(), entity.local_id());
        entity.set_favorited(false);
        self.write_through(entity);
    }

    fn apply_page(&mut self, kind: EntityKind, offset: usize, items: Vec<Entity>) {
        let received = items.len();
        for entity in items {
            self.apply_entity(entity, Origin::Listed);
        }
        if received >= self.page_size {
            self.request_page(kind, offset + received);
            return;
        }
        self.listed_kinds.insert(kind);
        debug!("listed all favorited {} items", kind.as_str());
        if self.all_items_listed() {
            info!("favorites listed: {} rows", self.table.len());
            self.observer.all_items_listed();
        }
    }

    fn set_note_count(&mut self, local_id: &str, count: u32) {
        let Some(item) = self.table.get(local_id) else {
            return;
        };
        if item.note_count == Some(count) {
            return;
        }
        let mut counted = item.clone();
        counted.note_count = Some(count);
        self.update_row(counted);
    }

    fn apply_expunge(&mut self, report: ExpungeReport) {
        let mut removed: Vec<(EntityKind, String)> =
            vec![(report.kind, report.local_id.clone())];
        match report.kind {
            EntityKind::Notebook => {
                let mut notes: BTreeSet<String> = report.expunged_notes.iter().cloned().collect();
                notes.extend(self.indices.notes_in_notebook(&report.local_id));
                removed.extend(notes.into_iter().map(|id| (EntityKind::Note, id)));
            }
            EntityKind::Tag => {
                let mut tags: BTreeSet<String> = report.expunged_tags.iter().cloned().collect();
                tags.extend(self.indices.tag_descendants(&report.local_id));
                removed.extend(tags.into_iter().map(|id| (EntityKind::Tag, id)));
            }
            EntityKind::Note | EntityKind::SavedSearch => {}
        }

        let mut note_links = None;
        for (kind, local_id) in &removed {
            let links = self.indices.forget(*kind, local_id);
            self.remove_row(local_id);
            if *kind == report.kind && *local_id == report.local_id {
                note_links = links;
            }
            self.caches.borrow_mut().remove(*kind, local_id);
        }
        for note_id in &report.detached_notes {
            self.caches.borrow_mut().remove(EntityKind::Note, note_id);
        }

        match report.kind {
            EntityKind::Notebook | EntityKind::Tag => self.recount_all(),
            EntityKind::Note => match note_links {
                Some(links) => self.recount_links(link_ids(&links)),
                None => self.recount_all(),
            },
            EntityKind::SavedSearch => {}
        }
    }
}
