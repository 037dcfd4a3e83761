//! Saved search model.

use super::new_local_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub local_id: String,
    pub guid: Option<String>,
    pub name: String,
    /// Search grammar string, stored verbatim.
    pub query: String,
    pub is_favorited: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SavedSearch {
    pub fn new(name: String, query: String) -> Self {
        let now = Utc::now();
        Self {
            local_id: new_local_id(),
            guid: None,
            name,
            query,
            is_favorited: false,
            created_at: now,
            updated_at: now,
        }
    }
}
