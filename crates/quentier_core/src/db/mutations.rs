//! Atomic create/update/expunge operations that keep cross-table links valid.

use super::store::{load_all, load_row, name_taken, save_row, StoredEntity};
use super::{tables::*, Database};
use crate::error::AppError;
use crate::models::{Entity, EntityKind, Note, Notebook, SavedSearch, Tag};
use crate::validation::{validate_name, ValidationError};
use chrono::Utc;
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Everything removed by one expunge, including cascaded rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpungeReport {
    pub kind: EntityKind,
    pub local_id: String,
    /// Notes removed along with an expunged notebook.
    pub expunged_notes: Vec<String>,
    /// Descendant tags removed along with an expunged tag.
    pub expunged_tags: Vec<String>,
    /// Notes that lost one or more tags.
    pub detached_notes: Vec<String>,
}

impl ExpungeReport {
    fn new(kind: EntityKind, local_id: &str) -> Self {
        Self {
            kind,
            local_id: local_id.to_string(),
            expunged_notes: Vec::new(),
            expunged_tags: Vec::new(),
            detached_notes: Vec::new(),
        }
    }
}

/// Returns `true` if placing `tag_id` under `new_parent_id` introduces a cycle.
pub fn introduces_cycle(tags: &[Tag], tag_id: &str, new_parent_id: &str) -> bool {
    let parent_map: HashMap<&str, Option<&str>> = tags
        .iter()
        .map(|t| (t.local_id.as_str(), t.parent_local_id.as_deref()))
        .collect();
    let mut current = Some(new_parent_id);
    let mut visited = HashSet::new();

    while let Some(curr) = current {
        if !visited.insert(curr) || curr == tag_id {
            return true;
        }
        current = parent_map.get(curr).copied().flatten();
    }

    false
}

/// Descendants of `root_id` (excluding the root), parents before children.
pub fn tag_descendants(tags: &[Tag], root_id: &str) -> Vec<String> {
    let mut to_visit = vec![root_id.to_string()];
    let mut discovered = Vec::new();
    let mut visited = HashSet::new();

    while let Some(current) = to_visit.pop() {
        if !visited.insert(current.clone()) {
            continue;
        }
        if current != root_id {
            discovered.push(current.clone());
        }
        for child in tags
            .iter()
            .filter(|t| t.parent_local_id.as_deref() == Some(current.as_str()))
        {
            to_visit.push(child.local_id.clone());
        }
    }

    discovered
}

fn duplicate_name<T: StoredEntity>(row: &T) -> AppError {
    ValidationError::Duplicate {
        kind: T::KIND,
        name: row.name().to_string(),
    }
    .into()
}

fn ensure_unique<T: StoredEntity>(
    table: &redb::Table<&str, &[u8]>,
    row: &T,
) -> Result<(), AppError> {
    if T::KIND != EntityKind::Note && name_taken::<T, _>(table, row.name(), row.local_id())? {
        return Err(duplicate_name(row));
    }
    Ok(())
}

fn insert_new<T: StoredEntity>(txn: &WriteTransaction, row: &T) -> Result<(), AppError> {
    let mut table = txn.open_table(T::TABLE)?;
    if table.get(row.local_id())?.is_some() {
        return Err(AppError::Conflict(format!(
            "{} id '{}' already exists",
            T::KIND,
            row.local_id()
        )));
    }
    ensure_unique(&table, row)?;
    save_row(&mut table, row)
}

/// Replace an existing row, keeping its creation time. `Ok(None)` when missing.
fn replace_existing<T: StoredEntity>(
    txn: &WriteTransaction,
    mut row: T,
) -> Result<Option<(T, T)>, AppError> {
    let mut table = txn.open_table(T::TABLE)?;
    let Some(previous) = load_row::<T, _>(&table, row.local_id())? else {
        return Ok(None);
    };
    ensure_unique(&table, &row)?;
    row.stamp(previous.created_at(), Utc::now());
    save_row(&mut table, &row)?;
    Ok(Some((previous, row)))
}

fn ensure_note_links(txn: &WriteTransaction, note: &Note) -> Result<(), AppError> {
    let notebooks = txn.open_table(NOTEBOOKS)?;
    if notebooks.get(note.notebook_local_id.as_str())?.is_none() {
        return Err(AppError::BadRequest(format!(
            "Notebook '{}' does not exist",
            note.notebook_local_id
        )));
    }
    let tags = txn.open_table(TAGS)?;
    for tag_id in &note.tag_local_ids {
        if tags.get(tag_id.as_str())?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Tag '{}' does not exist",
                tag_id
            )));
        }
    }
    Ok(())
}

fn ensure_tag_parent(txn: &WriteTransaction, tag: &Tag) -> Result<(), AppError> {
    let Some(parent_id) = tag.parent_local_id.as_deref() else {
        return Ok(());
    };
    if parent_id == tag.local_id {
        return Err(AppError::BadRequest(
            "Tag cannot be its own parent".to_string(),
        ));
    }
    let table = txn.open_table(TAGS)?;
    let tags: Vec<Tag> = load_all(&table)?;
    if tags.iter().all(|t| t.local_id != parent_id) {
        return Err(AppError::BadRequest(format!(
            "Parent tag '{}' does not exist",
            parent_id
        )));
    }
    if introduces_cycle(&tags, &tag.local_id, parent_id) {
        return Err(AppError::BadRequest(
            "Tag parent would create a cycle".to_string(),
        ));
    }
    Ok(())
}

fn notes_in_notebook(txn: &WriteTransaction, notebook_id: &str) -> Result<Vec<String>, AppError> {
    let index = txn.open_table(NOTES_BY_NOTEBOOK)?;
    let mut ids = Vec::new();
    for item in index.range((notebook_id, "")..)? {
        let (key, _) = item?;
        let (owner, note_id) = key.value();
        if owner != notebook_id {
            break;
        }
        ids.push(note_id.to_string());
    }
    Ok(ids)
}

impl Database {
    /// Insert a new entity.
    ///
    /// # Returns
    /// The stored entity.
    ///
    /// # Errors
    /// Returns [`AppError::Validation`] for bad or duplicate names,
    /// [`AppError::Conflict`] when the local id exists, [`AppError::BadRequest`]
    /// for dangling notebook/tag/parent references, or a storage error.
    pub fn create(&self, entity: Entity) -> Result<Entity, AppError> {
        validate_name(entity.kind(), entity.display_name())?;
        let write_txn = self.db.begin_write()?;
        match &entity {
            Entity::Note(note) => {
                ensure_note_links(&write_txn, note)?;
                insert_new(&write_txn, note)?;
                let mut index = write_txn.open_table(NOTES_BY_NOTEBOOK)?;
                index.insert(
                    (note.notebook_local_id.as_str(), note.local_id.as_str()),
                    (),
                )?;
            }
            Entity::Notebook(notebook) => insert_new(&write_txn, notebook)?,
            Entity::Tag(tag) => {
                ensure_tag_parent(&write_txn, tag)?;
                insert_new(&write_txn, tag)?;
            }
            Entity::SavedSearch(search) => insert_new(&write_txn, search)?,
        }
        write_txn.commit()?;
        debug!(kind = %entity.kind(), local_id = entity.local_id(), "created entity");
        Ok(entity)
    }

    /// Replace an existing entity with `entity`.
    ///
    /// # Returns
    /// `Ok(Some(stored))` with the refreshed timestamps, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Same as [`Database::create`].
    pub fn update(&self, entity: Entity) -> Result<Option<Entity>, AppError> {
        validate_name(entity.kind(), entity.display_name())?;
        let write_txn = self.db.begin_write()?;
        let stored: Option<Entity> = match entity {
            Entity::Note(note) => {
                ensure_note_links(&write_txn, &note)?;
                match replace_existing(&write_txn, note)? {
                    Some((previous, note)) => {
                        if previous.notebook_local_id != note.notebook_local_id {
                            let mut index = write_txn.open_table(NOTES_BY_NOTEBOOK)?;
                            index.remove((
                                previous.notebook_local_id.as_str(),
                                previous.local_id.as_str(),
                            ))?;
                            index.insert(
                                (note.notebook_local_id.as_str(), note.local_id.as_str()),
                                (),
                            )?;
                        }
                        Some(note.into())
                    }
                    None => None,
                }
            }
            Entity::Notebook(notebook) => {
                replace_existing::<Notebook>(&write_txn, notebook)?.map(|(_, row)| row.into())
            }
            Entity::Tag(tag) => {
                ensure_tag_parent(&write_txn, &tag)?;
                replace_existing::<Tag>(&write_txn, tag)?.map(|(_, row)| row.into())
            }
            Entity::SavedSearch(search) => {
                replace_existing::<SavedSearch>(&write_txn, search)?.map(|(_, row)| row.into())
            }
        };
        if stored.is_none() {
            return Ok(None);
        }
        write_txn.commit()?;
        Ok(stored)
    }

    /// Fetch any entity by kind and local id.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn find(&self, kind: EntityKind, local_id: &str) -> Result<Option<Entity>, AppError> {
        Ok(match kind {
            EntityKind::Note => self.notes.get(local_id)?.map(Entity::from),
            EntityKind::Notebook => self.notebooks.get(local_id)?.map(Entity::from),
            EntityKind::Tag => self.tags.get(local_id)?.map(Entity::from),
            EntityKind::SavedSearch => self.saved_searches.get(local_id)?.map(Entity::from),
        })
    }

    /// Permanently remove an entity and everything that depends on it.
    ///
    /// Expunging a notebook removes its notes; expunging a tag removes its
    /// descendant tags and detaches all of them from notes.
    ///
    /// # Returns
    /// `Ok(Some(report))` on success, `Ok(None)` when the entity is missing.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn expunge(
        &self,
        kind: EntityKind,
        local_id: &str,
    ) -> Result<Option<ExpungeReport>, AppError> {
        let write_txn = self.db.begin_write()?;
        let mut report = ExpungeReport::new(kind, local_id);
        match kind {
            EntityKind::Note => {
                let mut notes = write_txn.open_table(NOTES)?;
                let Some(note) = load_row::<Note, _>(&notes, local_id)? else {
                    return Ok(None);
                };
                notes.remove(local_id)?;
                let mut index = write_txn.open_table(NOTES_BY_NOTEBOOK)?;
                index.remove((note.notebook_local_id.as_str(), local_id))?;
            }
            EntityKind::Notebook => {
                let mut notebooks = write_txn.open_table(NOTEBOOKS)?;
                if notebooks.remove(local_id)?.is_none() {
                    return Ok(None);
                }
                let note_ids = notes_in_notebook(&write_txn, local_id)?;
                let mut notes = write_txn.open_table(NOTES)?;
                let mut index = write_txn.open_table(NOTES_BY_NOTEBOOK)?;
                for note_id in &note_ids {
                    notes.remove(note_id.as_str())?;
                    index.remove((local_id, note_id.as_str()))?;
                }
                report.expunged_notes = note_ids;
            }
            EntityKind::Tag => {
                let mut tags = write_txn.open_table(TAGS)?;
                if tags.get(local_id)?.is_none() {
                    return Ok(None);
                }
                let all_tags: Vec<Tag> = load_all(&tags)?;
                let descendants = tag_descendants(&all_tags, local_id);
                tags.remove(local_id)?;
                for tag_id in &descendants {
                    tags.remove(tag_id.as_str())?;
                }

                let removed: HashSet<&str> = descendants
                    .iter()
                    .map(String::as_str)
                    .chain(std::iter::once(local_id))
                    .collect();
                let mut notes = write_txn.open_table(NOTES)?;
                let all_notes: Vec<Note> = load_all(&notes)?;
                for mut note in all_notes {
                    let before = note.tag_local_ids.len();
                    note.tag_local_ids.retain(|id| !removed.contains(id.as_str()));
                    if note.tag_local_ids.len() != before {
                        save_row(&mut notes, &note)?;
                        report.detached_notes.push(note.local_id);
                    }
                }
                report.expunged_tags = descendants;
            }
            EntityKind::SavedSearch => {
                let mut searches = write_txn.open_table(SAVED_SEARCHES)?;
                if searches.remove(local_id)?.is_none() {
                    return Ok(None);
                }
            }
        }
        write_txn.commit()?;
        debug!(
            kind = %kind,
            local_id = local_id,
            cascaded_notes = report.expunged_notes.len(),
            cascaded_tags = report.expunged_tags.len(),
            "expunged entity"
        );
        Ok(Some(report))
    }

    /// Number of non-trashed notes in a notebook or carrying a tag.
    ///
    /// # Errors
    /// Returns [`AppError::BadRequest`] for kinds without note counts, or a
    /// storage error.
    pub fn count_notes(&self, kind: EntityKind, local_id: &str) -> Result<u32, AppError> {
        let read_txn = self.db.begin_read()?;
        let notes = read_txn.open_table(NOTES)?;
        let mut count = 0u32;
        match kind {
            EntityKind::Notebook => {
                let index = read_txn.open_table(NOTES_BY_NOTEBOOK)?;
                for item in index.range((local_id, "")..)? {
                    let (key, _) = item?;
                    let (owner, note_id) = key.value();
                    if owner != local_id {
                        break;
                    }
                    if let Some(note) = load_row::<Note, _>(&notes, note_id)? {
                        if !note.is_in_trash() {
                            count += 1;
                        }
                    }
                }
            }
            EntityKind::Tag => {
                for note in load_all::<Note, _>(&notes)? {
                    if !note.is_in_trash() && note.has_tag(local_id) {
                        count += 1;
                    }
                }
            }
            other => {
                return Err(AppError::BadRequest(format!(
                    "{} has no note count",
                    other
                )));
            }
        }
        Ok(count)
    }
}
