//! Row type, columns and ordering for the favorites model.

use crate::model::table::TableItem;
use icu_collator::{Collator, CollatorOptions, Strength};
use quentier_core::models::{Entity, EntityKind};
use std::cmp::Ordering;
use tracing::warn;

/// One favorited entity as shown in the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesItem {
    pub local_id: String,
    pub display_name: String,
    pub kind: EntityKind,
    /// Notes in a notebook or with a tag. `None` until counted, and always
    /// `None` for notes and saved searches.
    pub note_count: Option<u32>,
}

impl FavoritesItem {
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            local_id: entity.local_id().to_string(),
            display_name: entity.display_name().to_string(),
            kind: entity.kind(),
            note_count: None,
        }
    }
}

impl TableItem for FavoritesItem {
    fn key(&self) -> &str {
        &self.local_id
    }
}

/// Whether `entity` belongs in the favorites list.
pub fn is_favorite_row(entity: &Entity) -> bool {
    if !entity.is_favorited() || entity.display_name().is_empty() {
        return false;
    }
    match entity {
        Entity::Note(note) => !note.is_in_trash() && !note.notebook_local_id.is_empty(),
        _ => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Type,
    DisplayName,
    NoteCount,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Type, Column::DisplayName, Column::NoteCount];

    pub fn index(self) -> usize {
        match self {
            Column::Type => 0,
            Column::DisplayName => 1,
            Column::NoteCount => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Type => "Type",
            Column::DisplayName => "Name",
            Column::NoteCount => "Note count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Value displayed in one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Kind(EntityKind),
    Text(String),
    Count(Option<u32>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemFlags {
    pub enabled: bool,
    pub selectable: bool,
    pub editable: bool,
}

impl ItemFlags {
    pub fn read_only() -> Self {
        Self {
            enabled: true,
            selectable: true,
            editable: false,
        }
    }

    pub fn editable() -> Self {
        Self {
            editable: true,
            ..Self::read_only()
        }
    }
}

thread_local! {
    // Root-locale collation at secondary strength: accents count, case does not.
    static NAME_COLLATOR: Option<Collator> = {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);
        match Collator::try_new(&Default::default(), options) {
            Ok(collator) => Some(collator),
            Err(err) => {
                warn!("name collation unavailable, sorting by code point: {}", err);
                None
            }
        }
    };
}

fn compare_names(a: &str, b: &str) -> Ordering {
    NAME_COLLATOR.with(|collator| match collator {
        Some(collator) => collator.compare(a, b),
        None => a.to_lowercase().cmp(&b.to_lowercase()),
    })
}

/// Row ordering for `column` in `order`. Ties compare equal so stable sorts
/// and upper-bound inserts keep arrival order.
pub fn compare(column: Column, order: SortOrder, a: &FavoritesItem, b: &FavoritesItem) -> Ordering {
    let (a, b) = match order {
        SortOrder::Ascending => (a, b),
        SortOrder::Descending => (b, a),
    };
    match column {
        Column::Type => a.kind.cmp(&b.kind),
        Column::DisplayName => compare_names(&a.display_name, &b.display_name),
        Column::NoteCount => a.note_count.cmp(&b.note_count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quentier_core::models::{Note, Notebook};

    fn item(name: &str, count: Option<u32>) -> FavoritesItem {
        FavoritesItem {
            local_id: name.to_lowercase(),
            display_name: name.to_string(),
            kind: EntityKind::Tag,
            note_count: count,
        }
    }

    #[test]
    fn name_order_ignores_case() {
        let apple = item("apple", None);
        let banana = item("Banana", None);
        assert_eq!(
            compare(Column::DisplayName, SortOrder::Ascending, &apple, &banana),
            Ordering::Less
        );
        assert_eq!(
            compare(Column::DisplayName, SortOrder::Descending, &apple, &banana),
            Ordering::Greater
        );
    }

    #[test]
    fn accented_names_sort_with_their_base_letter() {
        let mut names = vec!["Zebra", "éclair", "Apple", "Eagle", "Ökonomie", "oak"];
        names.sort_by(|a, b| compare_names(a, b));
        assert_eq!(names, vec!["Apple", "Eagle", "éclair", "oak", "Ökonomie", "Zebra"]);
        assert_eq!(compare_names("Résumé", "résumé"), Ordering::Equal);
    }

    #[test]
    fn unknown_count_sorts_below_zero() {
        let unknown = item("a", None);
        let zero = item("b", Some(0));
        assert_eq!(
            compare(Column::NoteCount, SortOrder::Ascending, &unknown, &zero),
            Ordering::Less
        );
    }

    #[test]
    fn predicate_requires_favorited_live_notes() {
        let notebook = Notebook::new("Inbox".to_string());
        let mut note = Note::new("Plan".to_string(), notebook.local_id.clone());
        assert!(!is_favorite_row(&Entity::Note(note.clone())));

        note.is_favorited = true;
        assert!(is_favorite_row(&Entity::Note(note.clone())));

        note.deleted_at = Some(chrono::Utc::now());
        assert!(!is_favorite_row(&Entity::Note(note.clone())));

        note.deleted_at = None;
        note.notebook_local_id.clear();
        assert!(!is_favorite_row(&Entity::Note(note)));
    }

    #[test]
    fn columns_round_trip_through_index() {
        for column in Column::ALL {
            assert_eq!(Column::from_index(column.index()), Some(column));
        }
        assert_eq!(Column::from_index(3), None);
        assert_eq!(Column::NoteCount.header(), "Note count");
    }
}
