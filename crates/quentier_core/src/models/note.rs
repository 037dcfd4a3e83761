//! Note model.

use super::new_local_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A note. Content is opaque to this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub local_id: String,
    pub guid: Option<String>,
    pub title: String,
    pub content: String,
    pub notebook_local_id: String,
    pub tag_local_ids: Vec<String>,
    pub is_favorited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set when the note has been moved to the trash.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Note {
    /// Create a new note inside `notebook_local_id`.
    pub fn new(title: String, notebook_local_id: String) -> Self {
        let now = Utc::now();
        Self {
            local_id: new_local_id(),
            guid: None,
            title,
            content: String::new(),
            notebook_local_id,
            tag_local_ids: Vec::new(),
            is_favorited: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_in_trash(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn has_tag(&self, tag_local_id: &str) -> bool {
        self.tag_local_ids.iter().any(|id| id == tag_local_id)
    }
}
