//! Cache Item Module
//!
//! The stored unit: a value plus the clock reading taken when it was written.

use serde::{Deserialize, Serialize};

// == Cache Item ==
/// A cached value wrapped with its write timestamp (milliseconds).
///
/// The timestamp is assigned by the owning cache from its clock. Items are
/// replaced as a whole on overwrite, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheItem<V> {
    /// The cached payload
    pub value: V,
    /// Capture time in milliseconds, relative to the owning cache's clock
    pub timestamp: i64,
}

impl<V> CacheItem<V> {
    // == Constructor ==
    /// Wraps a value with the given capture time.
    pub fn new(value: V, timestamp: i64) -> Self {
        Self { value, timestamp }
    }

    // == Is Expired ==
    /// Checks whether the item has outlived `ttl_ms` at clock reading `now`.
    ///
    /// Only a strictly greater age counts: an item exactly `ttl_ms` old is
    /// still fresh. A negative age (clock moved backward, or a timestamp from
    /// the future) is never expired.
    pub fn is_expired(&self, now: i64, ttl_ms: i64) -> bool {
        now.saturating_sub(self.timestamp) > ttl_ms
    }

    /// Unwraps the payload.
    pub fn into_value(self) -> V {
        self.value
    }
}
