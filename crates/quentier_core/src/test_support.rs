//! Shared test-only helpers for quentier_core.

use crate::models::{Note, Notebook, Tag};
use crate::Database;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

pub(crate) fn create_notebook(db: &Database, name: &str, favorited: bool) -> Notebook {
    let mut notebook = Notebook::new(name.to_string());
    notebook.is_favorited = favorited;
    db.create(notebook.clone().into()).expect("create notebook");
    notebook
}

pub(crate) fn create_tag(db: &Database, name: &str, parent: Option<&Tag>) -> Tag {
    let tag = Tag::with_parent(name.to_string(), parent.map(|p| p.local_id.clone()));
    db.create(tag.clone().into()).expect("create tag");
    tag
}

pub(crate) fn create_note(db: &Database, title: &str, notebook: &Notebook, tags: &[&Tag]) -> Note {
    let mut note = Note::new(title.to_string(), notebook.local_id.clone());
    note.tag_local_ids = tags.iter().map(|t| t.local_id.clone()).collect();
    db.create(note.clone().into()).expect("create note");
    note
}
