//! Cache Store Module
//!
//! TTL policy, clock, and lock wrapped around a storage backend.

use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::{system_clock, CacheItem, CacheStats, Clock};
use crate::storage::Storage;

/// State guarded by the cache lock.
struct Inner<S> {
    storage: S,
    stats: CacheStats,
}

// == TTL Cache ==
/// Expiry-aware cache over a [`Storage`] backend.
///
/// Every operation holds a single per-instance lock for its whole duration,
/// storage round trip included, so the read-check-evict sequence in
/// [`get`](Self::get) never interleaves with a concurrent write or removal.
/// The guard is released on every exit path, including when the calling
/// future is dropped mid-operation.
///
/// Expiry is lazy: stale entries stay in storage until a `get`, `remove`,
/// or `clear` touches them. Storage failures never reach the caller; they
/// are logged and the operation behaves as a miss or a no-op.
pub struct TtlCache<K, V, S> {
    ttl: Duration,
    ttl_ms: i64,
    clock: Clock,
    inner: Mutex<Inner<S>>,
    _marker: PhantomData<fn(K) -> V>,
}

impl<K, V, S> TtlCache<K, V, S>
where
    K: Debug + Send + Sync + 'static,
    V: Send + 'static,
    S: Storage<K, CacheItem<V>>,
{
    // == Constructor ==
    /// Creates a cache that owns `storage` and timestamps entries with `clock`.
    ///
    /// # Arguments
    /// * `ttl` - Validity window applied to every entry
    /// * `storage` - Backend, exclusively owned by this cache
    /// * `clock` - Time source in milliseconds
    pub fn new(ttl: Duration, storage: S, clock: Clock) -> Self {
        Self {
            ttl,
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
            clock,
            inner: Mutex::new(Inner {
                storage,
                stats: CacheStats::new(),
            }),
            _marker: PhantomData,
        }
    }

    /// Creates a cache reading the system wall clock.
    pub fn with_system_clock(ttl: Duration, storage: S) -> Self {
        Self::new(ttl, storage, system_clock())
    }

    /// The fixed validity window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Put ==
    /// Stores `value` under `key`, stamped with the current clock reading.
    ///
    /// Overwrites unconditionally. A storage failure is logged and swallowed;
    /// the next `get` simply misses.
    pub async fn put(&self, key: &K, value: V) {
        let mut inner = self.inner.lock().await;
        let item = CacheItem::new(value, (self.clock)());

        if let Err(e) = inner.storage.put(key, item).await {
            inner.stats.record_storage_failure();
            warn!(key = ?key, error = %e, "Cache write failed");
        }
    }

    // == Get ==
    /// Returns the value under `key` if present and not older than the TTL.
    ///
    /// An expired entry is removed from storage as part of the lookup.
    /// Absent, expired, and unreadable entries all yield `None`.
    pub async fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().await;
        let now = (self.clock)();

        let item = match inner.storage.get(key).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                inner.stats.record_miss();
                debug!(key = ?key, "Cache miss");
                return None;
            }
            Err(e) => {
                inner.stats.record_storage_failure();
                inner.stats.record_miss();
                warn!(key = ?key, error = %e, "Cache read failed");
                return None;
            }
        };

        if item.is_expired(now, self.ttl_ms) {
            if let Err(e) = inner.storage.remove(key).await {
                inner.stats.record_storage_failure();
                warn!(key = ?key, error = %e, "Failed to evict expired entry");
            }
            inner.stats.record_expiration();
            inner.stats.record_miss();
            debug!(key = ?key, age_ms = now.saturating_sub(item.timestamp), "Cache entry expired");
            return None;
        }

        inner.stats.record_hit();
        debug!(key = ?key, "Cache hit");
        Some(item.into_value())
    }

    // == Is Stale ==
    /// `true` when `key` is absent or expired. Never modifies storage.
    pub async fn is_stale(&self, key: &K) -> bool {
        let mut inner = self.inner.lock().await;

        match inner.storage.get(key).await {
            Ok(Some(item)) => item.is_expired((self.clock)(), self.ttl_ms),
            Ok(None) => true,
            Err(e) => {
                inner.stats.record_storage_failure();
                warn!(key = ?key, error = %e, "Cache read failed");
                true
            }
        }
    }

    // == Remove ==
    /// Deletes the entry under `key`, fresh, expired, or absent.
    pub async fn remove(&self, key: &K) {
        let mut inner = self.inner.lock().await;

        if let Err(e) = inner.storage.remove(key).await {
            inner.stats.record_storage_failure();
            warn!(key = ?key, error = %e, "Cache remove failed");
        }
    }

    // == Clear ==
    /// Deletes everything the backend manages.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;

        if let Err(e) = inner.storage.clear().await {
            inner.stats.record_storage_failure();
            warn!(error = %e, "Cache clear failed");
        }
    }

    // == Stats ==
    /// Returns a snapshot of the counters.
    pub async fn stats(&self) -> CacheStats {
        self.inner.lock().await.stats.clone()
    }
}
