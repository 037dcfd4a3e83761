//! Rows kept in display order with a local-id index over them.

use std::cmp::Ordering;
use std::collections::HashMap;

/// A row that can live in an [`ItemTable`].
pub trait TableItem {
    /// Stable key, unique within the table.
    fn key(&self) -> &str;
}

/// Ordered rows plus a key -> row map. Every public method leaves both views
/// describing the same set of items at the same rows.
#[derive(Debug, Clone)]
pub struct ItemTable<T> {
    rows: Vec<T>,
    positions: HashMap<String, usize>,
}

impl<T> Default for ItemTable<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            positions: HashMap::new(),
        }
    }
}

impl<T: TableItem> ItemTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.iter()
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn item_at(&self, row: usize) -> Option<&T> {
        self.rows.get(row)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.index_of(key).and_then(|row| self.rows.get(row))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    fn reindex_from(&mut self, first: usize) {
        for (row, item) in self.rows.iter().enumerate().skip(first) {
            self.positions.insert(item.key().to_string(), row);
        }
    }

    fn reindex_all(&mut self) {
        self.positions.clear();
        self.reindex_from(0);
    }

    /// Row at which `item` would be inserted to keep `cmp` order: after every
    /// row that does not compare greater, so equal items keep arrival order.
    pub fn insertion_row<F>(&self, item: &T, mut cmp: F) -> usize
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        self.rows
            .partition_point(|existing| cmp(item, existing) != Ordering::Less)
    }

    /// Insert `item` at `row` (clamped to the end).
    ///
    /// # Returns
    /// `false`, without inserting, when the key is already present.
    pub fn insert_at(&mut self, row: usize, item: T) -> bool {
        if self.positions.contains_key(item.key()) {
            return false;
        }
        let row = row.min(self.rows.len());
        self.rows.insert(row, item);
        self.reindex_from(row);
        true
    }

    /// Insert `item` at its sorted row.
    ///
    /// # Returns
    /// The row used, or `None` when the key is already present.
    pub fn insert_sorted<F>(&mut self, item: T, cmp: F) -> Option<usize>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let row = self.insertion_row(&item, cmp);
        self.insert_at(row, item).then_some(row)
    }

    /// Replace the row holding `item`'s key in place.
    ///
    /// # Returns
    /// The row and the previous value, or `None` when the key is absent.
    pub fn replace(&mut self, item: T) -> Option<(usize, T)> {
        let row = self.index_of(item.key())?;
        let previous = std::mem::replace(&mut self.rows[row], item);
        Some((row, previous))
    }

    /// Remove the item with `key`.
    pub fn remove(&mut self, key: &str) -> Option<(usize, T)> {
        let row = self.index_of(key)?;
        self.remove_at(row).map(|item| (row, item))
    }

    pub fn remove_at(&mut self, row: usize) -> Option<T> {
        if row >= self.rows.len() {
            return None;
        }
        let item = self.rows.remove(row);
        self.positions.remove(item.key());
        self.reindex_from(row);
        Some(item)
    }

    /// Move the item at `from` so that it ends up at `to`.
    pub fn move_row(&mut self, from: usize, to: usize) -> bool {
        if from >= self.rows.len() || to >= self.rows.len() {
            return false;
        }
        if from == to {
            return true;
        }
        let item = self.rows.remove(from);
        self.rows.insert(to, item);
        self.reindex_from(from.min(to));
        true
    }

    /// Row `key` should occupy under `cmp` if it alone were out of place.
    pub fn sorted_row_of<F>(&self, key: &str, mut cmp: F) -> Option<usize>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let current = self.index_of(key)?;
        let item = &self.rows[current];
        let mut target = 0;
        for (row, other) in self.rows.iter().enumerate() {
            if row != current && cmp(item, other) != Ordering::Less {
                target += 1;
            }
        }
        Some(target)
    }

    /// Move the item with `key` to its sorted row, assuming every other row
    /// is already in `cmp` order.
    ///
    /// # Returns
    /// `(from, to)` rows, or `None` when the key is absent.
    pub fn reposition<F>(&mut self, key: &str, cmp: F) -> Option<(usize, usize)>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let from = self.index_of(key)?;
        let to = self.sorted_row_of(key, cmp)?;
        self.move_row(from, to);
        Some((from, to))
    }

    /// Stable full sort.
    ///
    /// # Returns
    /// `permutation[old_row] == new_row`.
    pub fn sort_by<F>(&mut self, mut cmp: F) -> Vec<usize>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|a, b| cmp(&self.rows[*a], &self.rows[*b]));

        let mut permutation = vec![0; order.len()];
        for (new_row, old_row) in order.iter().enumerate() {
            permutation[*old_row] = new_row;
        }

        let mut slots: Vec<Option<T>> = self.rows.drain(..).map(Some).collect();
        self.rows = order
            .iter()
            .filter_map(|old_row| slots[*old_row].take())
            .collect();
        self.reindex_all();
        permutation
    }

    /// Reverse row order in place.
    pub fn reverse(&mut self) {
        self.rows.reverse();
        self.reindex_all();
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.positions.clear();
    }
}
