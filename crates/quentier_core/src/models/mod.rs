//! Entity models persisted by local storage and consumed by the models layer.

/// Notes.
pub mod note;
/// Notebooks and their sharing restrictions.
pub mod notebook;
/// Saved searches.
pub mod saved_search;
/// Tags.
pub mod tag;


use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub use note::Note;
pub use notebook::{Notebook, NotebookRestrictions};
pub use saved_search::SavedSearch;
pub use tag::Tag;

/// Generate a fresh local identifier.
pub fn new_local_id() -> String {
    Uuid::new_v4().to_string()
}

/// The four kinds of entity the application works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Note,
    Notebook,
    Tag,
    SavedSearch,
}

impl EntityKind {
    /// All kinds, in the order models request their first list page.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Note,
        EntityKind::Notebook,
        EntityKind::Tag,
        EntityKind::SavedSearch,
    ];

    /// Lowercase label used in logs and CLI output.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Note => "note",
            EntityKind::Notebook => "notebook",
            EntityKind::Tag => "tag",
            EntityKind::SavedSearch => "saved search",
        }
    }

    /// Whether rows of this kind carry a note count.
    pub fn has_note_count(self) -> bool {
        matches!(self, EntityKind::Notebook | EntityKind::Tag)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Note => "Note",
            EntityKind::Notebook => "Notebook",
            EntityKind::Tag => "Tag",
            EntityKind::SavedSearch => "Saved search",
        };
        f.write_str(label)
    }
}

/// Any storable entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Note(Note),
    Notebook(Notebook),
    Tag(Tag),
    SavedSearch(SavedSearch),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Note(_) => EntityKind::Note,
            Entity::Notebook(_) => EntityKind::Notebook,
            Entity::Tag(_) => EntityKind::Tag,
            Entity::SavedSearch(_) => EntityKind::SavedSearch,
        }
    }

    pub fn local_id(&self) -> &str {
        match self {
            Entity::Note(note) => &note.local_id,
            Entity::Notebook(notebook) => &notebook.local_id,
            Entity::Tag(tag) => &tag.local_id,
            Entity::SavedSearch(search) => &search.local_id,
        }
    }

    /// Title for notes, name for everything else.
    pub fn display_name(&self) -> &str {
        match self {
            Entity::Note(note) => &note.title,
            Entity::Notebook(notebook) => &notebook.name,
            Entity::Tag(tag) => &tag.name,
            Entity::SavedSearch(search) => &search.name,
        }
    }

    pub fn set_display_name(&mut self, name: String) {
        match self {
            Entity::Note(note) => note.title = name,
            Entity::Notebook(notebook) => notebook.name = name,
            Entity::Tag(tag) => tag.name = name,
            Entity::SavedSearch(search) => search.name = name,
        }
    }

    pub fn is_favorited(&self) -> bool {
        match self {
            Entity::Note(note) => note.is_favorited,
            Entity::Notebook(notebook) => notebook.is_favorited,
            Entity::Tag(tag) => tag.is_favorited,
            Entity::SavedSearch(search) => search.is_favorited,
        }
    }

    pub fn set_favorited(&mut self, favorited: bool) {
        match self {
            Entity::Note(note) => note.is_favorited = favorited,
            Entity::Notebook(notebook) => notebook.is_favorited = favorited,
            Entity::Tag(tag) => tag.is_favorited = favorited,
            Entity::SavedSearch(search) => search.is_favorited = favorited,
        }
    }
}

impl From<Note> for Entity {
    fn from(value: Note) -> Self {
        Entity::Note(value)
    }
}

impl From<Notebook> for Entity {
    fn from(value: Notebook) -> Self {
        Entity::Notebook(value)
    }
}

impl From<Tag> for Entity {
    fn from(value: Tag) -> Self {
        Entity::Tag(value)
    }
}

impl From<SavedSearch> for Entity {
    fn from(value: SavedSearch) -> Self {
        Entity::SavedSearch(value)
    }
}
