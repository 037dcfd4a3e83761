//! Edits coming from the view: rename, unfavorite, sort.

use super::{Column, FavoritesItem, FavoritesModel, Intent, ItemFlags, SortOrder};
use crate::model::ModelError;
use quentier_core::models::EntityKind;
use quentier_core::validation::{ensure_unique_name, validate_name};

impl FavoritesModel {
    pub fn flags(&self, row: usize, column: Column) -> ItemFlags {
        let Some(item) = self.table.item_at(row) else {
            return ItemFlags::default();
        };
        if column == Column::DisplayName && self.can_rename(item) {
            ItemFlags::editable()
        } else {
            ItemFlags::read_only()
        }
    }

    fn can_rename(&self, item: &FavoritesItem) -> bool {
        let indices = &self.indices;
        match item.kind {
            EntityKind::Notebook => indices
                .notebook_restrictions(&item.local_id)
                .map_or(true, |r| r.can_update_notebook()),
            EntityKind::Note => indices
                .note_links(&item.local_id)
                .and_then(|links| indices.notebook_restrictions(&links.notebook_local_id))
                .map_or(true, |r| r.can_update_notes()),
            EntityKind::Tag => indices
                .tag_linked_notebook(&item.local_id)
                .and_then(|guid| indices.restrictions_for_guid(guid))
                .map_or(true, |r| r.can_update_tags()),
            EntityKind::SavedSearch => true,
        }
    }

    /// Rename the item at `row`.
    ///
    /// The new name is trimmed, validated and checked for case-insensitive
    /// collisions with other rows of the same kind before anything changes.
    /// On success the row shows the new name at once and the update is sent to
    /// storage; if storage rejects it the row is restored from storage later.
    ///
    /// # Returns
    /// `true` if the name changed, `false` if it was already `value`.
    ///
    /// # Errors
    /// Returns a validation error if the cell is not editable or the name is
    /// rejected, and an internal error if `row` is out of range.
    pub fn set_data(&mut self, row: usize, column: Column, value: &str) -> Result<bool, ModelError> {
        let Some(item) = self.table.item_at(row).cloned() else {
            let err = ModelError::internal(format!("row {} is out of range", row));
            self.report(err.clone());
            return Err(err);
        };
        if !self.flags(row, column).editable {
            return Err(ModelError::validation(format!(
                "{} '{}' cannot be renamed",
                item.kind, item.display_name
            )));
        }

        let name = value.trim();
        if name == item.display_name {
            return Ok(false);
        }
        validate_name(item.kind, name)?;
        let names = self.indices.names(item.kind);
        ensure_unique_name(item.kind, name, |key| {
            names
                .and_then(|index| index.owner(key))
                .is_some_and(|owner| owner != item.local_id)
        })?;

        let mut renamed = item.clone();
        renamed.display_name = name.to_string();
        self.update_row(renamed);
        self.push_rename(item.kind, &item.local_id, name.to_string());
        Ok(true)
    }

    fn push_rename(&mut self, kind: EntityKind, local_id: &str, name: String) {
        let cached = self.caches.borrow_mut().get(kind, local_id);
        match cached {
            Some(mut entity) => {
                entity.set_display_name(name);
                self.write_through(entity);
            }
            None => self.request_find(
                Intent::FindToPerformUpdate {
                    kind,
                    local_id: local_id.to_string(),
                    name,
                },
                kind,
                local_id,
            ),
        }
    }

    /// Remove `count` rows starting at `row` and clear their favorited flag
    /// in storage.
    ///
    /// # Errors
    /// Returns an internal error if the range does not fit the table; no row
    /// is removed in that case.
    pub fn remove_rows(&mut self, row: usize, count: usize) -> Result<(), ModelError> {
        if count == 0 {
            return Ok(());
        }
        let Some(end) = row
            .checked_add(count)
            .filter(|end| *end <= self.table.len())
        else {
            let err = ModelError::internal(format!(
                "cannot remove {} rows at {}: table has {}",
                count,
                row,
                self.table.len()
            ));
            self.report(err.clone());
            return Err(err);
        };

        self.observer.rows_about_to_be_removed(row, end - 1);
        let mut removed = Vec::with_capacity(count);
        for _ in row..end {
            if let Some(item) = self.table.remove_at(row) {
                self.indices.release(item.kind, &item.local_id);
                removed.push(item);
            }
        }
        self.persistent.rows_removed(row, count);
        self.observer.rows_removed(row, end - 1);

        for item in removed {
            self.push_unfavorite(item.kind, &item.local_id);
        }
        Ok(())
    }

    fn push_unfavorite(&mut self, kind: EntityKind, local_id: &str) {
        let cached = self.caches.borrow_mut().get(kind, local_id);
        match cached {
            Some(mut entity) => {
                entity.set_favorited(false);
                self.write_through(entity);
            }
            None => self.request_find(
                Intent::FindToUnfavorite {
                    kind,
                    local_id: local_id.to_string(),
                },
                kind,
                local_id,
            ),
        }
    }

    /// Sort rows by `column` in `order`.
    ///
    /// Flipping only the order reverses the rows in place. Ties keep their
    /// current relative order. Persistent indices follow their items.
    pub fn sort(&mut self, column: Column, order: SortOrder) {
        if column == self.sort_column && order == self.sort_order {
            return;
        }
        let reverse_only = column == self.sort_column;
        self.sort_column = column;
        self.sort_order = order;
        let cmp = self.comparator();
        self.change_layout(|table| {
            if reverse_only {
                table.reverse();
            } else {
                table.sort_by(cmp);
            }
        });
    }
}
