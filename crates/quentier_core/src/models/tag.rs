//! Tag model.

use super::new_local_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tag, optionally nested under a parent tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub local_id: String,
    pub guid: Option<String>,
    pub name: String,
    pub parent_local_id: Option<String>,
    /// Guid of the shared notebook this tag came from, if any.
    pub linked_notebook_guid: Option<String>,
    pub is_favorited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    pub fn new(name: String) -> Self {
        Self::with_parent(name, None)
    }

    pub fn with_parent(name: String, parent_local_id: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            local_id: new_local_id(),
            guid: None,
            name,
            parent_local_id,
            linked_notebook_guid: None,
            is_favorited: false,
            created_at: now,
            updated_at: now,
        }
    }
}
