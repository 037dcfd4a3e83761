//! Row handles that follow their item through inserts, removals and resorts.

use std::cell::Cell;
use std::rc::{Rc, Weak};

/// A row reference held outside the model (a selection, an open editor).
///
/// The row becomes `None` once the referenced item is removed.
#[derive(Debug, Clone)]
pub struct PersistentIndex {
    row: Rc<Cell<Option<usize>>>,
    column: usize,
}

impl PersistentIndex {
    pub fn row(&self) -> Option<usize> {
        self.row.get()
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn is_valid(&self) -> bool {
        self.row.get().is_some()
    }
}

/// Live handles registered with a model.
#[derive(Debug, Default)]
pub struct PersistentIndices {
    slots: Vec<Weak<Cell<Option<usize>>>>,
}

/// Keys captured before a layout change, restored afterwards.
#[must_use]
pub struct PendingRemap {
    entries: Vec<(Rc<Cell<Option<usize>>>, String)>,
}

impl PersistentIndices {
    pub fn create(&mut self, row: usize, column: usize) -> PersistentIndex {
        let slot = Rc::new(Cell::new(Some(row)));
        self.slots.push(Rc::downgrade(&slot));
        PersistentIndex { row: slot, column }
    }

    fn live(&mut self) -> impl Iterator<Item = Rc<Cell<Option<usize>>>> + '_ {
        self.slots.retain(|slot| slot.strong_count() > 0);
        self.slots.iter().filter_map(Weak::upgrade)
    }

    /// Number of handles still held by someone.
    pub fn len(&mut self) -> usize {
        self.live().count()
    }

    pub fn is_empty(&mut self) -> bool {
        self.len() == 0
    }

    /// `count` rows were inserted at `first`.
    pub fn rows_inserted(&mut self, first: usize, count: usize) {
        for slot in self.live() {
            if let Some(row) = slot.get() {
                if row >= first {
                    slot.set(Some(row + count));
                }
            }
        }
    }

    /// `count` rows starting at `first` were removed.
    pub fn rows_removed(&mut self, first: usize, count: usize) {
        let end = first + count;
        for slot in self.live() {
            match slot.get() {
                Some(row) if row >= end => slot.set(Some(row - count)),
                Some(row) if row >= first => slot.set(None),
                _ => {}
            }
        }
    }

    /// Record the key under every held row before the rows are permuted.
    pub fn capture<F>(&mut self, key_at: F) -> PendingRemap
    where
        F: Fn(usize) -> Option<String>,
    {
        let entries = self
            .live()
            .filter_map(|slot| {
                let key = slot.get().and_then(&key_at)?;
                Some((slot, key))
            })
            .collect();
        PendingRemap { entries }
    }

    /// Point every captured handle at the row its key now occupies.
    pub fn restore<F>(&mut self, pending: PendingRemap, index_of: F)
    where
        F: Fn(&str) -> Option<usize>,
    {
        for (slot, key) in pending.entries {
            slot.set(index_of(&key));
        }
    }
}
