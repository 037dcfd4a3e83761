//! Derived lookups the favorites model keeps alongside its rows.

use quentier_core::models::{Entity, EntityKind, NotebookRestrictions};
use quentier_core::validation::name_key;
use std::collections::{BTreeSet, HashMap};

/// Case-folded name <-> local id, one pair per row.
#[derive(Debug, Default)]
pub(crate) struct NameIndex {
    by_key: HashMap<String, String>,
    by_id: HashMap<String, String>,
}

impl NameIndex {
    pub(crate) fn insert(&mut self, local_id: &str, name: &str) {
        self.remove(local_id);
        let key = name_key(name);
        if let Some(previous_owner) = self.by_key.insert(key.clone(), local_id.to_string()) {
            self.by_id.remove(&previous_owner);
        }
        self.by_id.insert(local_id.to_string(), key);
    }

    pub(crate) fn remove(&mut self, local_id: &str) {
        if let Some(key) = self.by_id.remove(local_id) {
            if self.by_key.get(&key).map(String::as_str) == Some(local_id) {
                self.by_key.remove(&key);
            }
        }
    }

    /// Local id owning the case-folded `key`.
    pub(crate) fn owner(&self, key: &str) -> Option<&str> {
        self.by_key.get(key).map(String::as_str)
    }

    pub(crate) fn clear(&mut self) {
        self.by_key.clear();
        self.by_id.clear();
    }
}

/// Notebook and tags a note was filed under when last seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NoteLinks {
    pub notebook_local_id: String,
    pub tag_local_ids: Vec<String>,
}

#[derive(Debug, Default)]
pub(crate) struct AuxIndices {
    names: HashMap<EntityKind, NameIndex>,
    notebook_guids: HashMap<String, String>,
    restrictions: HashMap<String, NotebookRestrictions>,
    tag_linked_notebooks: HashMap<String, String>,
    tag_parents: HashMap<String, String>,
    tag_children: HashMap<String, BTreeSet<String>>,
    notes: HashMap<String, NoteLinks>,
}

impl AuxIndices {
    pub(crate) fn names(&self, kind: EntityKind) -> Option<&NameIndex> {
        self.names.get(&kind)
    }

    pub(crate) fn set_row_name(&mut self, kind: EntityKind, local_id: &str, name: &str) {
        self.names.entry(kind).or_default().insert(local_id, name);
    }

    pub(crate) fn remove_row_name(&mut self, kind: EntityKind, local_id: &str) {
        if let Some(index) = self.names.get_mut(&kind) {
            index.remove(local_id);
        }
    }

    /// Record relations carried by `entity`.
    ///
    /// # Returns
    /// For notes, the links recorded before this call, if the note was known.
    pub(crate) fn observe(&mut self, entity: &Entity) -> Option<NoteLinks> {
        match entity {
            Entity::Notebook(notebook) => {
                if let Some(old_guid) = self.notebook_guids.remove(&notebook.local_id) {
                    self.restrictions.remove(&old_guid);
                }
                if let Some(guid) = &notebook.guid {
                    self.notebook_guids
                        .insert(notebook.local_id.clone(), guid.clone());
                    if let Some(restrictions) = notebook.restrictions {
                        self.restrictions.insert(guid.clone(), restrictions);
                    }
                }
                None
            }
            Entity::Tag(tag) => {
                self.detach_tag_from_parent(&tag.local_id);
                if let Some(parent) = &tag.parent_local_id {
                    self.tag_parents.insert(tag.local_id.clone(), parent.clone());
                    self.tag_children
                        .entry(parent.clone())
                        .or_default()
                        .insert(tag.local_id.clone());
                }
                match &tag.linked_notebook_guid {
                    Some(guid) => {
                        self.tag_linked_notebooks
                            .insert(tag.local_id.clone(), guid.clone());
                    }
                    None => {
                        self.tag_linked_notebooks.remove(&tag.local_id);
                    }
                }
                None
            }
            Entity::Note(note) => self.notes.insert(
                note.local_id.clone(),
                NoteLinks {
                    notebook_local_id: note.notebook_local_id.clone(),
                    tag_local_ids: note.tag_local_ids.clone(),
                },
            ),
            Entity::SavedSearch(_) => None,
        }
    }

    fn detach_tag_from_parent(&mut self, tag_local_id: &str) {
        if let Some(parent) = self.tag_parents.remove(tag_local_id) {
            if let Some(children) = self.tag_children.get_mut(&parent) {
                children.remove(tag_local_id);
                if children.is_empty() {
                    self.tag_children.remove(&parent);
                }
            }
        }
    }

    /// Drop the entries owned by an entity that left the table.
    ///
    /// Notebook guids and restrictions stay: note rows filed in a notebook
    /// that is not itself a favorite still resolve their restrictions
    /// through them. Everything else about the entity goes.
    ///
    /// # Returns
    /// For notes, the links the note had.
    pub(crate) fn release(&mut self, kind: EntityKind, local_id: &str) -> Option<NoteLinks> {
        self.remove_row_name(kind, local_id);
        match kind {
            EntityKind::Note => self.notes.remove(local_id),
            EntityKind::Tag => {
                self.detach_tag_from_parent(local_id);
                self.tag_linked_notebooks.remove(local_id);
                None
            }
            EntityKind::Notebook | EntityKind::SavedSearch => None,
        }
    }

    /// Drop everything known about an entity that no longer exists.
    ///
    /// # Returns
    /// For notes, the links the note had.
    pub(crate) fn forget(&mut self, kind: EntityKind, local_id: &str) -> Option<NoteLinks> {
        self.remove_row_name(kind, local_id);
        match kind {
            EntityKind::Notebook => {
                if let Some(guid) = self.notebook_guids.remove(local_id) {
                    self.restrictions.remove(&guid);
                }
                None
            }
            EntityKind::Tag => {
                self.detach_tag_from_parent(local_id);
                if let Some(children) = self.tag_children.remove(local_id) {
                    for child in children {
                        self.tag_parents.remove(&child);
                    }
                }
                self.tag_linked_notebooks.remove(local_id);
                for links in self.notes.values_mut() {
                    links.tag_local_ids.retain(|id| id != local_id);
                }
                None
            }
            EntityKind::Note => self.notes.remove(local_id),
            EntityKind::SavedSearch => None,
        }
    }

    pub(crate) fn note_links(&self, note_local_id: &str) -> Option<&NoteLinks> {
        self.notes.get(note_local_id)
    }

    /// Known notes filed in `notebook_local_id`.
    pub(crate) fn notes_in_notebook(&self, notebook_local_id: &str) -> Vec<String> {
        self.notes
            .iter()
            .filter(|(_, links)| links.notebook_local_id == notebook_local_id)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Known descendants of `tag_local_id`, parents before children.
    pub(crate) fn tag_descendants(&self, tag_local_id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![tag_local_id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(children) = self.tag_children.get(&current) {
                for child in children {
                    if child != tag_local_id && !out.contains(child) {
                        out.push(child.clone());
                        stack.push(child.clone());
                    }
                }
            }
        }
        out
    }

    pub(crate) fn restrictions_for_guid(&self, guid: &str) -> Option<NotebookRestrictions> {
        self.restrictions.get(guid).copied()
    }

    pub(crate) fn notebook_restrictions(
        &self,
        notebook_local_id: &str,
    ) -> Option<NotebookRestrictions> {
        let guid = self.notebook_guids.get(notebook_local_id)?;
        self.restrictions_for_guid(guid)
    }

    pub(crate) fn tag_linked_notebook(&self, tag_local_id: &str) -> Option<&str> {
        self.tag_linked_notebooks
            .get(tag_local_id)
            .map(String::as_str)
    }

    pub(crate) fn clear(&mut self) {
        for index in self.names.values_mut() {
            index.clear();
        }
        self.notebook_guids.clear();
        self.restrictions.clear();
        self.tag_linked_notebooks.clear();
        self.tag_parents.clear();
        self.tag_children.clear();
        self.notes.clear();
    }
}
