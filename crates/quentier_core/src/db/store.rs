//! Generic per-kind row access shared by all entity tables.

use crate::{
    db::tables::*,
    error::AppError,
    models::{Entity, EntityKind, Note, Notebook, SavedSearch, Tag},
    validation::name_key,
};
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::{de::DeserializeOwned, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;

/// Which rows a list request returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    All,
    /// Favorited rows only; trashed notes are excluded.
    Favorited,
}

/// Ordering applied before pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    /// Case-insensitive name, ties by local id.
    ByName,
    /// Most recently updated first.
    ByUpdated,
}

/// Behaviour shared by the four entity row types.
pub trait StoredEntity: Serialize + DeserializeOwned + Clone + Into<Entity> {
    const KIND: EntityKind;
    const TABLE: TableDefinition<'static, &'static str, &'static [u8]>;

    fn local_id(&self) -> &str;
    fn name(&self) -> &str;
    fn is_favorited(&self) -> bool;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>);

    /// Trashed rows never count as favorited.
    fn is_trashed(&self) -> bool;

    fn matches(&self, filter: ListFilter) -> bool {
        match filter {
            ListFilter::All => true,
            ListFilter::Favorited => self.is_favorited() && !self.is_trashed(),
        }
    }

    /// Pull the concrete row back out of an [`Entity`] of the same kind.
    fn from_entity(entity: Entity) -> Option<Self>;
}

macro_rules! stored_entity {
    ($ty:ty, $kind:expr, $table:expr, $variant:ident, $name:ident, $trashed:expr) => {
        impl StoredEntity for $ty {
            const KIND: EntityKind = $kind;
            const TABLE: TableDefinition<'static, &'static str, &'static [u8]> = $table;

            fn local_id(&self) -> &str {
                &self.local_id
            }
            fn name(&self) -> &str {
                &self.$name
            }
            fn is_favorited(&self) -> bool {
                self.is_favorited
            }
            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
            fn updated_at(&self) -> DateTime<Utc> {
                self.updated_at
            }
            fn stamp(&mut self, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) {
                self.created_at = created_at;
                self.updated_at = updated_at;
            }
            fn is_trashed(&self) -> bool {
                ($trashed)(self)
            }
            fn from_entity(entity: Entity) -> Option<Self> {
                match entity {
                    Entity::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

stored_entity!(Note, EntityKind::Note, NOTES, Note, title, Note::is_in_trash);
stored_entity!(Notebook, EntityKind::Notebook, NOTEBOOKS, Notebook, name, |_| false);
stored_entity!(Tag, EntityKind::Tag, TAGS, Tag, name, |_| false);
stored_entity!(
    SavedSearch,
    EntityKind::SavedSearch,
    SAVED_SEARCHES,
    SavedSearch,
    name,
    |_| false
);

/// Decode one row from any readable entity table.
pub(crate) fn load_row<T, R>(table: &R, local_id: &str) -> Result<Option<T>, AppError>
where
    T: StoredEntity,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    match table.get(local_id)? {
        Some(guard) => Ok(Some(bincode::deserialize(guard.value())?)),
        None => Ok(None),
    }
}

/// Decode every row of an entity table.
pub(crate) fn load_all<T, R>(table: &R) -> Result<Vec<T>, AppError>
where
    T: StoredEntity,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    let mut rows = Vec::new();
    for item in table.iter()? {
        let (_, value) = item?;
        rows.push(bincode::deserialize(value.value())?);
    }
    Ok(rows)
}

pub(crate) fn save_row<T: StoredEntity>(
    table: &mut redb::Table<&str, &[u8]>,
    row: &T,
) -> Result<(), AppError> {
    let encoded = bincode::serialize(row)?;
    table.insert(row.local_id(), encoded.as_slice())?;
    Ok(())
}

/// Whether another row (not `except_local_id`) already uses `name`, ignoring case.
pub(crate) fn name_taken<T, R>(table: &R, name: &str, except_local_id: &str) -> Result<bool, AppError>
where
    T: StoredEntity,
    R: ReadableTable<&'static str, &'static [u8]>,
{
    let key = name_key(name);
    for row in load_all::<T, R>(table)? {
        if row.local_id() != except_local_id && name_key(row.name()) == key {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Sort, filter and paginate rows for a list request.
pub(crate) fn paginate<T: StoredEntity>(
    mut rows: Vec<T>,
    filter: ListFilter,
    offset: usize,
    limit: usize,
    order: ListOrder,
) -> Vec<T> {
    rows.retain(|row| row.matches(filter));
    match order {
        ListOrder::ByName => rows.sort_by(|a, b| {
            name_key(a.name())
                .cmp(&name_key(b.name()))
                .then_with(|| a.local_id().cmp(b.local_id()))
        }),
        ListOrder::ByUpdated => rows.sort_by(|a, b| {
            b.updated_at()
                .cmp(&a.updated_at())
                .then_with(|| a.local_id().cmp(b.local_id()))
        }),
    }
    rows.into_iter().skip(offset).take(limit).collect()
}

/// Read-only accessor for one entity table.
pub struct EntityStore<T> {
    db: Arc<redb::Database>,
    _row: PhantomData<fn() -> T>,
}

impl<T: StoredEntity> EntityStore<T> {
    pub(crate) fn new(db: Arc<redb::Database>) -> Self {
        Self {
            db,
            _row: PhantomData,
        }
    }

    /// Fetch a row by local id.
    ///
    /// # Returns
    /// `Ok(Some(row))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, local_id: &str) -> Result<Option<T>, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(T::TABLE)?;
        load_row(&table, local_id)
    }

    /// List one page of rows.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list(
        &self,
        filter: ListFilter,
        offset: usize,
        limit: usize,
        order: ListOrder,
    ) -> Result<Vec<T>, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(T::TABLE)?;
        let rows = load_all::<T, _>(&table)?;
        Ok(paginate(rows, filter, offset, limit, order))
    }

    /// Find a row whose name matches `name` case-insensitively.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn find_by_name(&self, name: &str) -> Result<Option<T>, AppError> {
        let key = name_key(name);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(T::TABLE)?;
        Ok(load_all::<T, _>(&table)?
            .into_iter()
            .find(|row| name_key(row.name()) == key))
    }

    /// Number of rows in the table.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn len(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(T::TABLE)?;
        Ok(table.len()?)
    }

    /// Whether the table has no rows.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }
}
