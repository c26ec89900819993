//! Storage Module
//!
//! Expiry-unaware persistence beneath the cache. A backend offers keyed
//! put/get/remove/clear and nothing else; it has no concurrency guarantees of
//! its own, which is why every method takes `&mut self`. The owning cache
//! serializes access through its lock.

mod codec;
mod file;
mod memory;

use async_trait::async_trait;

use crate::error::StorageResult;

pub use codec::{Codec, JsonCodec};
pub use file::{hashed_file_name, sanitize_file_name, FileStorage, KeyToFileName, STORAGE_DIR_NAME};
pub use memory::MemoryStorage;

// == Storage Trait ==
/// Durable keyed storage with no notion of time.
#[async_trait]
pub trait Storage<K, V>: Send {
    /// Writes `value` under `key`, replacing any previous value.
    async fn put(&mut self, key: &K, value: V) -> StorageResult<()>;

    /// Reads the value under `key`, `None` when absent.
    async fn get(&mut self, key: &K) -> StorageResult<Option<V>>;

    /// Deletes the value under `key`. Absent keys are not an error.
    async fn remove(&mut self, key: &K) -> StorageResult<()>;

    /// Deletes everything the backend manages.
    async fn clear(&mut self) -> StorageResult<()>;
}

/// Type-erased storage backend.
pub type BoxedStorage<K, V> = Box<dyn Storage<K, V>>;

#[async_trait]
impl<K, V> Storage<K, V> for Box<dyn Storage<K, V>>
where
    K: Send + Sync + 'static,
    V: Send + 'static,
{
    async fn put(&mut self, key: &K, value: V) -> StorageResult<()> {
        (**self).put(key, value).await
    }

    async fn get(&mut self, key: &K) -> StorageResult<Option<V>> {
        (**self).get(key).await
    }

    async fn remove(&mut self, key: &K) -> StorageResult<()> {
        (**self).remove(key).await
    }

    async fn clear(&mut self) -> StorageResult<()> {
        (**self).clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_boxed_storage_forwards() {
        let mut storage: BoxedStorage<String, u32> = Box::new(MemoryStorage::new());
        let key = "k".to_string();

        storage.put(&key, 7).await.unwrap();
        assert_eq!(storage.get(&key).await.unwrap(), Some(7));

        storage.remove(&key).await.unwrap();
        assert_eq!(storage.get(&key).await.unwrap(), None);

        storage.put(&key, 8).await.unwrap();
        storage.clear().await.unwrap();
        assert_eq!(storage.get(&key).await.unwrap(), None);
    }
}
