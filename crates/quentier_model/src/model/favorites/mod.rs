//! Favorited notes, notebooks, tags and saved searches in one sorted list.
//!
//! The model lives on the UI thread. Reads are answered from memory; edits
//! update memory first and are then written through the storage worker.
//! Responses come back through [`FavoritesModel::apply_event`] and are matched
//! to the request that caused them by request id.

mod edit;
mod events;
mod indices;
mod item;

#[cfg(test)]
mod tests;

pub use item::{compare, is_favorite_row, CellValue, Column, FavoritesItem, ItemFlags, SortOrder};

use self::indices::AuxIndices;
use crate::backend::{RequestId, StorageCmd};
use crate::model::{
    CellRange, Correlator, ItemTable, ModelError, ModelObserver, NoopObserver, PersistentIndex,
    PersistentIndices, SharedCaches,
};
use crossbeam_channel::Sender;
use quentier_core::db::{ListFilter, ListOrder};
use quentier_core::models::{Entity, EntityKind};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// What an outstanding request was sent for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Intent {
    ListPage { kind: EntityKind, offset: usize },
    CountNotes { kind: EntityKind, local_id: String },
    Update { kind: EntityKind, local_id: String },
    FindToPerformUpdate {
        kind: EntityKind,
        local_id: String,
        name: String,
    },
    FindToUnfavorite { kind: EntityKind, local_id: String },
    FindToRestoreFailedUpdate { kind: EntityKind, local_id: String },
}

impl Intent {
    fn label(&self) -> &'static str {
        match self {
            Intent::ListPage { .. } => "list page",
            Intent::CountNotes { .. } => "note count",
            Intent::Update { .. } => "update",
            Intent::FindToPerformUpdate { .. } => "find before update",
            Intent::FindToUnfavorite { .. } => "find before unfavorite",
            Intent::FindToRestoreFailedUpdate { .. } => "find after failed update",
        }
    }
}

pub struct FavoritesModel {
    cmd_tx: Sender<StorageCmd>,
    caches: SharedCaches,
    page_size: usize,
    table: ItemTable<FavoritesItem>,
    indices: AuxIndices,
    pending: Correlator<Intent>,
    persistent: PersistentIndices,
    observer: Box<dyn ModelObserver>,
    sort_column: Column,
    sort_order: SortOrder,
    listed_kinds: BTreeSet<EntityKind>,
    list_failed: bool,
}

impl FavoritesModel {
    /// Create an empty model sending commands on `cmd_tx`.
    ///
    /// Nothing is requested until [`FavoritesModel::start`]. Rows are sorted
    /// by name, ascending.
    pub fn new(cmd_tx: Sender<StorageCmd>, caches: SharedCaches, page_size: usize) -> Self {
        Self {
            cmd_tx,
            caches,
            page_size: page_size.max(1),
            table: ItemTable::new(),
            indices: AuxIndices::default(),
            pending: Correlator::new(),
            persistent: PersistentIndices::default(),
            observer: Box::new(NoopObserver),
            sort_column: Column::DisplayName,
            sort_order: SortOrder::Ascending,
            listed_kinds: BTreeSet::new(),
            list_failed: false,
        }
    }

    pub fn set_observer(&mut self, observer: Box<dyn ModelObserver>) {
        self.observer = observer;
    }

    /// Request the first favorited page of every kind.
    pub fn start(&mut self) {
        self.listed_kinds.clear();
        self.list_failed = false;
        for kind in EntityKind::ALL {
            self.request_page(kind, 0);
        }
    }

    /// Drop every row and forget outstanding requests.
    pub fn reset(&mut self) {
        if !self.table.is_empty() {
            let last = self.table.len() - 1;
            self.observer.rows_about_to_be_removed(0, last);
            self.persistent.rows_removed(0, self.table.len());
            self.table.clear();
            self.observer.rows_removed(0, last);
        }
        self.indices.clear();
        self.pending.clear();
        self.listed_kinds.clear();
        self.list_failed = false;
    }

    /// Whether no request sent by this model is still unanswered.
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn pending_requests(&self) -> usize {
        self.pending.len()
    }

    /// Whether every kind has been listed to its last page without failures.
    pub fn all_items_listed(&self) -> bool {
        !self.list_failed && self.listed_kinds.len() == EntityKind::ALL.len()
    }

    pub fn row_count(&self) -> usize {
        self.table.len()
    }

    pub fn column_count(&self) -> usize {
        Column::ALL.len()
    }

    pub fn header_data(&self, column: Column) -> &'static str {
        column.header()
    }

    pub fn data(&self, row: usize, column: Column) -> Option<CellValue> {
        let item = self.table.item_at(row)?;
        Some(match column {
            Column::Type => CellValue::Kind(item.kind),
            Column::DisplayName => CellValue::Text(item.display_name.clone()),
            Column::NoteCount => CellValue::Count(item.note_count),
        })
    }

    pub fn item_at(&self, row: usize) -> Option<&FavoritesItem> {
        self.table.item_at(row)
    }

    pub fn index_of(&self, local_id: &str) -> Option<usize> {
        self.table.index_of(local_id)
    }

    pub fn items(&self) -> impl Iterator<Item = &FavoritesItem> {
        self.table.iter()
    }

    pub fn sort_column(&self) -> Column {
        self.sort_column
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Handle that keeps pointing at the item now at `row`.
    pub fn persistent_index(&mut self, row: usize, column: Column) -> Option<PersistentIndex> {
        if row >= self.table.len() {
            return None;
        }
        Some(self.persistent.create(row, column.index()))
    }

    fn comparator(&self) -> impl Fn(&FavoritesItem, &FavoritesItem) -> Ordering {
        let column = self.sort_column;
        let order = self.sort_order;
        move |a, b| compare(column, order, a, b)
    }

    fn report(&mut self, error: ModelError) {
        warn!("favorites model: {}", error);
        self.observer.error(&error);
    }

    /// Record `intent` and send the command built for its request id.
    fn send(&mut self, intent: Intent, build: impl FnOnce(RequestId) -> StorageCmd) -> bool {
        let label = intent.label();
        let request_id = self.pending.begin(intent);
        if self.cmd_tx.send(build(request_id)).is_ok() {
            debug!(%request_id, "sent {} request", label);
            return true;
        }
        self.pending.resolve(request_id);
        self.report(ModelError::backend(format!(
            "{} failed: storage backend unavailable",
            label
        )));
        false
    }

    fn request_page(&mut self, kind: EntityKind, offset: usize) {
        let limit = self.page_size;
        self.send(Intent::ListPage { kind, offset }, |request_id| {
            StorageCmd::List {
                request_id,
                kind,
                filter: ListFilter::Favorited,
                offset,
                limit,
                order: ListOrder::ByName,
            }
        });
    }

    fn request_note_count(&mut self, kind: EntityKind, local_id: &str) {
        let intent = Intent::CountNotes {
            kind,
            local_id: local_id.to_string(),
        };
        let local_id = local_id.to_string();
        self.send(intent, |request_id| StorageCmd::CountNotes {
            request_id,
            kind,
            local_id,
        });
    }

    fn request_find(&mut self, intent: Intent, kind: EntityKind, local_id: &str) {
        let local_id = local_id.to_string();
        self.send(intent, |request_id| StorageCmd::Find {
            request_id,
            kind,
            local_id,
        });
    }

    fn send_update(&mut self, entity: Entity) {
        let intent = Intent::Update {
            kind: entity.kind(),
            local_id: entity.local_id().to_string(),
        };
        self.send(intent, |request_id| StorageCmd::Update { request_id, entity });
    }

    /// Cache `entity` as edited here and send it to storage.
    ///
    /// Later edits of the same entity start from this snapshot, so a second
    /// update sent before the first is confirmed does not undo it.
    fn write_through(&mut self, entity: Entity) {
        self.caches.borrow_mut().put(entity.clone());
        self.send_update(entity);
    }

    /// The cached snapshot of `found`'s entity if there is one, else `found`.
    fn latest_snapshot(&mut self, found: Entity) -> Entity {
        let cached = self
            .caches
            .borrow_mut()
            .get(found.kind(), found.local_id());
        cached.unwrap_or(found)
    }

    /// Recount every notebook and tag row.
    fn recount_all(&mut self) {
        let targets: Vec<(EntityKind, String)> = self
            .table
            .iter()
            .filter(|item| item.kind.has_note_count())
            .map(|item| (item.kind, item.local_id.clone()))
            .collect();
        for (kind, local_id) in targets {
            self.request_note_count(kind, &local_id);
        }
    }

    /// Recount whichever of `local_ids` are notebook or tag rows.
    fn recount_links<'a>(&mut self, local_ids: impl IntoIterator<Item = &'a str>) {
        let targets: BTreeSet<(EntityKind, String)> = local_ids
            .into_iter()
            .filter_map(|local_id| self.table.get(local_id))
            .filter(|item| item.kind.has_note_count())
            .map(|item| (item.kind, item.local_id.clone()))
            .collect();
        for (kind, local_id) in targets {
            self.request_note_count(kind, &local_id);
        }
    }

    fn insert_row(&mut self, item: FavoritesItem) {
        if self.table.contains(&item.local_id) {
            return;
        }
        let row = self.table.insertion_row(&item, self.comparator());
        self.indices
            .set_row_name(item.kind, &item.local_id, &item.display_name);
        self.observer.rows_about_to_be_inserted(row, row);
        self.table.insert_at(row, item);
        self.persistent.rows_inserted(row, 1);
        self.observer.rows_inserted(row, row);
    }

    fn remove_row(&mut self, local_id: &str) -> Option<FavoritesItem> {
        let row = self.table.index_of(local_id)?;
        self.observer.rows_about_to_be_removed(row, row);
        let item = self.table.remove_at(row)?;
        self.indices.release(item.kind, &item.local_id);
        self.persistent.rows_removed(row, 1);
        self.observer.rows_removed(row, row);
        Some(item)
    }

    /// Replace a row in place, notify changed cells and move it if the
    /// active sort key changed.
    fn update_row(&mut self, item: FavoritesItem) {
        let Some((row, previous)) = self.table.replace(item.clone()) else {
            self.report(ModelError::internal(format!(
                "{} '{}' has no row to update",
                item.kind, item.local_id
            )));
            return;
        };
        let name_changed = previous.display_name != item.display_name;
        let count_changed = previous.note_count != item.note_count;
        if name_changed {
            self.indices
                .set_row_name(item.kind, &item.local_id, &item.display_name);
            self.observer
                .data_changed(CellRange::cell(row, Column::DisplayName.index()));
        }
        if count_changed {
            self.observer
                .data_changed(CellRange::cell(row, Column::NoteCount.index()));
        }
        let sort_key_changed = match self.sort_column {
            Column::Type => false,
            Column::DisplayName => name_changed,
            Column::NoteCount => count_changed,
        };
        if sort_key_changed {
            self.reposition_row(&item.local_id);
        }
    }

    fn reposition_row(&mut self, local_id: &str) {
        let cmp = self.comparator();
        let (Some(from), Some(to)) = (
            self.table.index_of(local_id),
            self.table.sorted_row_of(local_id, &cmp),
        ) else {
            return;
        };
        if from == to {
            return;
        }
        self.change_layout(|table| {
            table.move_row(from, to);
        });
    }

    /// Permute rows inside a layout-change bracket, carrying persistent
    /// indices along by local id.
    fn change_layout(&mut self, permute: impl FnOnce(&mut ItemTable<FavoritesItem>)) {
        self.observer.layout_about_to_change();
        let table = &self.table;
        let remap = self
            .persistent
            .capture(|row| table.item_at(row).map(|item| item.local_id.clone()));
        permute(&mut self.table);
        let table = &self.table;
        self.persistent.restore(remap, |key| table.index_of(key));
        self.observer.layout_changed();
    }
}
