use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::base::{StorageBackend, StorageError, StorageItem};

/// Process-local store for dry runs and tests. Clones share contents.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    collections: Arc<RwLock<HashMap<String, HashMap<String, Value>>>>,
    batches: Arc<RwLock<Vec<usize>>>,
    failure: Option<StorageError>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every batch write fails with `error`.
    pub fn failing(error: StorageError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn get(&self, collection: &str, key: &str) -> Option<Value> {
        self.collections
            .read()
            .get(collection)
            .and_then(|items| items.get(key).cloned())
    }

    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, HashMap::len)
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    pub fn values(&self, collection: &str) -> Vec<Value> {
        self.collections
            .read()
            .get(collection)
            .map(|items| items.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Size of every batch write attempted, in call order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.read().clone()
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn upsert_batch(
        &self,
        collection: &str,
        items: Vec<StorageItem>,
    ) -> Result<(), StorageError> {
        self.batches.write().push(items.len());

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let mut collections = self.collections.write();
        let stored = collections.entry(collection.to_string()).or_default();
        for item in items {
            stored.insert(item.key, item.data);
        }

        Ok(())
    }
}
