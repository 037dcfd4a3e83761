//! Bounded least-recently-used caches of full entities, shared between models.

use quentier_core::models::{Entity, EntityKind, Note, Notebook, SavedSearch, Tag};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// LRU map keyed by local id.
///
/// `put` may evict an unrelated entry; callers must treat every lookup as a
/// possible miss.
#[derive(Debug)]
pub struct LruCache<V> {
    capacity: usize,
    entries: HashMap<String, (V, u64)>,
    recency: BTreeMap<u64, String>,
    tick: u64,
}

impl<V> LruCache<V> {
    /// Create a cache holding at most `capacity` entries (minimum one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            tick: 0,
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }

    /// Look up `key` and mark it most recently used.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let tick = self.next_tick();
        let (_, stamp) = self.entries.get_mut(key)?;
        let previous = std::mem::replace(stamp, tick);
        if let Some(owner) = self.recency.remove(&previous) {
            self.recency.insert(tick, owner);
        }
        self.entries.get(key).map(|(value, _)| value)
    }

    /// Look up `key` without touching its recency.
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.entries.get(key).map(|(value, _)| value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or refresh `key`.
    ///
    /// # Returns
    /// The evicted least-recently-used entry, if the insert overflowed.
    pub fn put(&mut self, key: String, value: V) -> Option<(String, V)> {
        let tick = self.next_tick();
        if let Some((old_value, old_stamp)) = self.entries.get_mut(&key) {
            *old_value = value;
            let previous = std::mem::replace(old_stamp, tick);
            self.recency.remove(&previous);
            self.recency.insert(tick, key);
            return None;
        }

        self.recency.insert(tick, key.clone());
        self.entries.insert(key, (value, tick));
        if self.entries.len() <= self.capacity {
            return None;
        }
        let (_, oldest) = self.recency.pop_first()?;
        self.entries
            .remove(&oldest)
            .map(|(value, _)| (oldest, value))
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let (value, stamp) = self.entries.remove(key)?;
        self.recency.remove(&stamp);
        Some(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }
}

/// One cache per entity kind.
#[derive(Debug)]
pub struct EntityCaches {
    pub notes: LruCache<Note>,
    pub notebooks: LruCache<Notebook>,
    pub tags: LruCache<Tag>,
    pub saved_searches: LruCache<SavedSearch>,
}

/// Caches shared by every model on the UI thread.
pub type SharedCaches = Rc<RefCell<EntityCaches>>;

impl EntityCaches {
    pub fn new(capacity: usize) -> Self {
        Self {
            notes: LruCache::new(capacity),
            notebooks: LruCache::new(capacity),
            tags: LruCache::new(capacity),
            saved_searches: LruCache::new(capacity),
        }
    }

    pub fn shared(capacity: usize) -> SharedCaches {
        Rc::new(RefCell::new(Self::new(capacity)))
    }

    /// Cached snapshot of an entity, promoted to most recently used.
    pub fn get(&mut self, kind: EntityKind, local_id: &str) -> Option<Entity> {
        match kind {
            EntityKind::Note => self.notes.get(local_id).cloned().map(Entity::from),
            EntityKind::Notebook => self.notebooks.get(local_id).cloned().map(Entity::from),
            EntityKind::Tag => self.tags.get(local_id).cloned().map(Entity::from),
            EntityKind::SavedSearch => self.saved_searches.get(local_id).cloned().map(Entity::from),
        }
    }

    pub fn put(&mut self, entity: Entity) {
        let key = entity.local_id().to_string();
        match entity {
            Entity::Note(note) => {
                self.notes.put(key, note);
            }
            Entity::Notebook(notebook) => {
                self.notebooks.put(key, notebook);
            }
            Entity::Tag(tag) => {
                self.tags.put(key, tag);
            }
            Entity::SavedSearch(search) => {
                self.saved_searches.put(key, search);
            }
        }
    }

    pub fn remove(&mut self, kind: EntityKind, local_id: &str) {
        match kind {
            EntityKind::Note => {
                self.notes.remove(local_id);
            }
            EntityKind::Notebook => {
                self.notebooks.remove(local_id);
            }
            EntityKind::Tag => {
                self.tags.remove(local_id);
            }
            EntityKind::SavedSearch => {
                self.saved_searches.remove(local_id);
            }
        }
    }
}
