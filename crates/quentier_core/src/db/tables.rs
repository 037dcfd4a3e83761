//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Canonical note rows (`Note`, bincode-encoded).
pub const NOTES: TableDefinition<&str, &[u8]> = TableDefinition::new("notes");
/// Canonical notebook rows (`Notebook`, bincode-encoded).
pub const NOTEBOOKS: TableDefinition<&str, &[u8]> = TableDefinition::new("notebooks");
/// Canonical tag rows (`Tag`, bincode-encoded).
pub const TAGS: TableDefinition<&str, &[u8]> = TableDefinition::new("tags");
/// Canonical saved search rows (`SavedSearch`, bincode-encoded).
pub const SAVED_SEARCHES: TableDefinition<&str, &[u8]> = TableDefinition::new("saved_searches");

/// Membership index keyed by `(notebook_local_id, note_local_id)`.
pub const NOTES_BY_NOTEBOOK: TableDefinition<(&str, &str), ()> =
    TableDefinition::new("notes_by_notebook");

/// Storage bookkeeping (schema version).
pub const META: TableDefinition<&str, u32> = TableDefinition::new("meta");

/// Key of the schema version row in [`META`].
pub const SCHEMA_VERSION_KEY: &str = "schema_version";
