//! # Item Store
//!
//! The store owns the ordered collection of [`Item`] records. Insertion order is
//! the order returned by [`ItemStore::all`]; updates keep an item's position.
//!
//! The store is an injected component: [`crate::service::ItemService`] receives it
//! as `Arc<dyn ItemStore>` at construction, so tests build isolated stores and a
//! persistent backend can slot in without touching service signatures.
//!
//! ## Concurrency
//!
//! [`MemoryStore`] guards its state with a single `parking_lot::RwLock`. Reads take
//! the shared lock and every mutation takes the exclusive lock, so each call is
//! atomic with respect to every other call.
//!
//! ## Identity
//!
//! The store remembers every id it has ever held. Inserting an id that is live, or
//! that was retired by a removal, fails with [`StoreError::DuplicateId`].

use parking_lot::RwLock;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

use crate::ids::ItemId;
use crate::model::Item;

/// Internal store fault
///
/// These are outside the service's business contract; the dispatcher surfaces
/// them as a generic server error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The id is already live in the store or was used by a removed item
    DuplicateId {
        /// The colliding id
        id: ItemId,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DuplicateId { id } => {
                write!(f, "item id '{}' has already been issued", id)
            }
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage backend for items.
///
/// Absent records are `Ok(None)`; `Err` is reserved for faults.
pub trait ItemStore: Send + Sync {
    /// Snapshot of every item in insertion order.
    fn all(&self) -> StoreResult<Vec<Item>>;

    /// Exact-match lookup.
    fn get(&self, id: &str) -> StoreResult<Option<Item>>;

    /// Append a new item as the last element.
    fn insert(&self, item: Item) -> StoreResult<Item>;

    /// Replace the name of an existing item in place.
    fn rename(&self, id: &str, name: String) -> StoreResult<Option<Item>>;

    /// Remove an item and hand it back.
    fn remove(&self, id: &str) -> StoreResult<Option<Item>>;

    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[derive(Default)]
struct Inner {
    items: Vec<Item>,
    /// Every id ever stored, removed ones included; grows with total ids created.
    issued: HashSet<ItemId>,
}

impl Inner {
    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == *id)
    }
}

/// Volatile in-process store; contents live as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `items`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if two seed items share an id.
    pub fn with_items(items: impl IntoIterator<Item = Item>) -> StoreResult<Self> {
        let store = Self::new();
        for item in items {
            store.insert(item)?;
        }
        Ok(store)
    }
}

impl ItemStore for MemoryStore {
    fn all(&self) -> StoreResult<Vec<Item>> {
        Ok(self.inner.read().items.clone())
    }

    fn get(&self, id: &str) -> StoreResult<Option<Item>> {
        let inner = self.inner.read();
        Ok(inner.items.iter().find(|item| item.id == *id).cloned())
    }

    fn insert(&self, item: Item) -> StoreResult<Item> {
        let mut inner = self.inner.write();
        if !inner.issued.insert(item.id.clone()) {
            return Err(StoreError::DuplicateId { id: item.id });
        }
        inner.items.push(item.clone());
        debug!(
            item_id = %item.id,
            store_len = inner.items.len(),
            "Item inserted"
        );
        Ok(item)
    }

    fn rename(&self, id: &str, name: String) -> StoreResult<Option<Item>> {
        let mut inner = self.inner.write();
        let Some(idx) = inner.position(id) else {
            return Ok(None);
        };
        let item = &mut inner.items[idx];
        item.name = name;
        debug!(item_id = %item.id, position = idx, "Item renamed");
        Ok(Some(item.clone()))
    }

    fn remove(&self, id: &str) -> StoreResult<Option<Item>> {
        let mut inner = self.inner.write();
        let Some(idx) = inner.position(id) else {
            return Ok(None);
        };
        let removed = inner.items.remove(idx);
        debug!(
            item_id = %removed.id,
            store_len = inner.items.len(),
            "Item removed"
        );
        Ok(Some(removed))
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.inner.read().items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let store = MemoryStore::new();
        store.insert(Item::new("a", "first")).unwrap();
        store.insert(Item::new("b", "second")).unwrap();
        let ids: Vec<_> = store
            .all()
            .unwrap()
            .into_iter()
            .map(|i| i.id.to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_live_id_is_rejected() {
        let store = MemoryStore::new();
        store.insert(Item::new("a", "first")).unwrap();
        let err = store.insert(Item::new("a", "again")).unwrap_err();
        assert_eq!(err, StoreError::DuplicateId { id: ItemId::from("a") });
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_retired_id_is_never_reused() {
        let store = MemoryStore::new();
        store.insert(Item::new("a", "first")).unwrap();
        store.remove("a").unwrap();
        assert!(store.is_empty().unwrap());
        assert!(store.insert(Item::new("a", "zombie")).is_err());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_rename_keeps_position() {
        let store = MemoryStore::with_items([
            Item::new("1", "one"),
            Item::new("2", "two"),
            Item::new("3", "three"),
        ])
        .unwrap();
        let renamed = store.rename("2", "deux".to_string()).unwrap().unwrap();
        assert_eq!(renamed, Item::new("2", "deux"));
        assert_eq!(store.all().unwrap()[1], Item::new("2", "deux"));
    }

    #[test]
    fn test_seed_with_duplicate_ids_fails() {
        let result = MemoryStore::with_items([Item::new("1", "one"), Item::new("1", "uno")]);
        assert!(result.is_err());
    }
}
