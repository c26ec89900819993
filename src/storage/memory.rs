//! In-memory storage backend.

use std::collections::HashMap;
use std::hash::Hash;

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::storage::Storage;

// == Memory Storage ==
/// HashMap-backed storage. Contents are lost when the process exits.
#[derive(Debug)]
pub struct MemoryStorage<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> MemoryStorage<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Returns the number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> Default for MemoryStorage<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K, V> Storage<K, V> for MemoryStorage<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    async fn put(&mut self, key: &K, value: V) -> StorageResult<()> {
        self.entries.insert(key.clone(), value);
        Ok(())
    }

    async fn get(&mut self, key: &K) -> StorageResult<Option<V>> {
        Ok(self.entries.get(key).cloned())
    }

    async fn remove(&mut self, key: &K) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn clear(&mut self) -> StorageResult<()> {
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_overwrites() {
        let mut storage = MemoryStorage::new();
        storage.put(&"k", 1).await.unwrap();
        storage.put(&"k", 2).await.unwrap();

        assert_eq!(storage.get(&"k").await.unwrap(), Some(2));
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let mut storage: MemoryStorage<&str, i32> = MemoryStorage::new();
        storage.remove(&"missing").await.unwrap();
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let mut storage = MemoryStorage::new();
        storage.put(&1u32, "a").await.unwrap();
        storage.put(&2u32, "b").await.unwrap();
        storage.clear().await.unwrap();
        assert!(storage.is_empty());
    }
}
