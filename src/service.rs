//! Item use-case service.
//!
//! The service is the only component that mutates the store. It has no notion of
//! HTTP: absent records come back as `None` and the dispatcher decides what that
//! means on the wire.

use std::sync::Arc;
use tracing::info;

use crate::ids::ItemId;
use crate::model::Item;
use crate::store::{ItemStore, StoreResult};

/// Business operations over an injected [`ItemStore`].
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Every item, in insertion order.
    pub fn list_all(&self) -> StoreResult<Vec<Item>> {
        self.store.all()
    }

    pub fn find_by_id(&self, id: &str) -> StoreResult<Option<Item>> {
        self.store.get(id)
    }

    /// Mint a fresh id and append `{id, name}` as the last item.
    ///
    /// The name is assumed to have passed the create schema already.
    pub fn create(&self, name: impl Into<String>) -> StoreResult<Item> {
        let item = self.store.insert(Item::new(ItemId::generate(), name))?;
        info!(item_id = %item.id, "Item created");
        Ok(item)
    }

    /// Replace the name of `id`; `None` leaves the store untouched.
    pub fn update(&self, id: &str, name: impl Into<String>) -> StoreResult<Option<Item>> {
        let updated = self.store.rename(id, name.into())?;
        if let Some(item) = &updated {
            info!(item_id = %item.id, "Item updated");
        }
        Ok(updated)
    }

    /// Remove `id` and return the record that was removed.
    pub fn remove(&self, id: &str) -> StoreResult<Option<Item>> {
        let removed = self.store.remove(id)?;
        if let Some(item) = &removed {
            info!(item_id = %item.id, "Item removed");
        }
        Ok(removed)
    }

    pub fn count(&self) -> StoreResult<usize> {
        self.store.len()
    }
}
