//! Notebook model.

use super::new_local_id;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Permissions granted on a shared notebook. All `false` means unrestricted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotebookRestrictions {
    pub no_update_notebook: bool,
    pub no_update_notes: bool,
    pub no_update_tags: bool,
}

impl NotebookRestrictions {
    pub fn can_update_notebook(&self) -> bool {
        !self.no_update_notebook
    }

    pub fn can_update_notes(&self) -> bool {
        !self.no_update_notes
    }

    pub fn can_update_tags(&self) -> bool {
        !self.no_update_tags
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub local_id: String,
    pub guid: Option<String>,
    pub name: String,
    pub is_favorited: bool,
    pub is_default: bool,
    pub restrictions: Option<NotebookRestrictions>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notebook {
    pub fn new(name: String) -> Self {
        let now = Utc::now();
        Self {
            local_id: new_local_id(),
            guid: None,
            name,
            is_favorited: false,
            is_default: false,
            restrictions: None,
            created_at: now,
            updated_at: now,
        }
    }
}
