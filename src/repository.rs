//! Read-through access to a remote source.
//!
//! `CachedSource` consults its cache first and only calls the source on a
//! miss. Successful fetches are written back; failures are returned to the
//! caller untouched and never cached.

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{CacheItem, TtlCache};
use crate::storage::Storage;

// == Source Trait ==
/// Remote origin of values, e.g. an HTTP API client.
#[async_trait]
pub trait Source<K, V>: Send + Sync {
    type Error: Send;

    async fn fetch(&self, key: &K) -> Result<V, Self::Error>;
}

/// Where a loaded value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Source,
}

/// A loaded value with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<V> {
    pub value: V,
    pub origin: Origin,
}

// == Cached Source ==
pub struct CachedSource<K, V, S, F> {
    cache: Arc<TtlCache<K, V, S>>,
    source: F,
    should_cache: fn(&V) -> bool,
}

impl<K, V, S, F> CachedSource<K, V, S, F>
where
    K: Debug + Send + Sync + 'static,
    V: Clone + Send + 'static,
    S: Storage<K, CacheItem<V>>,
    F: Source<K, V>,
{
    /// Caches every successful fetch.
    pub fn new(cache: Arc<TtlCache<K, V, S>>, source: F) -> Self {
        Self {
            cache,
            source,
            should_cache: |_| true,
        }
    }

    /// Only caches fetched values accepted by `predicate`, e.g. to avoid
    /// pinning an empty article list for a whole TTL.
    pub fn with_cache_filter(mut self, predicate: fn(&V) -> bool) -> Self {
        self.should_cache = predicate;
        self
    }

    /// The underlying cache.
    pub fn cache(&self) -> &Arc<TtlCache<K, V, S>> {
        &self.cache
    }

    // == Load ==
    /// Returns the cached value for `key`, fetching and caching it on a miss.
    pub async fn load(&self, key: &K) -> Result<Loaded<V>, F::Error> {
        if let Some(value) = self.cache.get(key).await {
            return Ok(Loaded {
                value,
                origin: Origin::Cache,
            });
        }

        let value = self.source.fetch(key).await?;
        if (self.should_cache)(&value) {
            self.cache.put(key, value.clone()).await;
        } else {
            debug!(key = ?key, "Fetched value rejected by cache filter");
        }

        Ok(Loaded {
            value,
            origin: Origin::Source,
        })
    }
}
