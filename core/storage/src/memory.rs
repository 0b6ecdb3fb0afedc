//! In-memory store for testing.

use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use crate::store::VaultStore;
use keyhaven_common::{EntryKey, Error, Result};

/// In-memory vault store.
///
/// Useful for testing and development. All data is stored in memory and
/// lost on drop. Collections use a `BTreeMap` so `get_all` has a stable
/// key order.
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VaultStore for MemoryStore {
    async fn get(&self, collection: &str, id: &EntryKey) -> Result<Vec<u8>> {
        let collections = self.collections.read().unwrap();

        collections
            .get(collection)
            .and_then(|records| records.get(id.as_str()))
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("{}/{}", collection, id)))
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<Vec<u8>>> {
        let collections = self.collections.read().unwrap();

        Ok(collections
            .get(collection)
            .map(|records| records.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn put(&self, collection: &str, id: &EntryKey, record: Vec<u8>) -> Result<()> {
        let mut collections = self.collections.write().unwrap();

        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.as_str().to_string(), record);

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &EntryKey) -> Result<()> {
        let mut collections = self.collections.write().unwrap();

        let removed = collections
            .get_mut(collection)
            .and_then(|records| records.remove(id.as_str()));

        match removed {
            Some(_) => Ok(()),
            None => Err(Error::NotFound(format!("{}/{}", collection, id))),
        }
    }
}
