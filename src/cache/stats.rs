//! Cache Statistics Module
//!
//! Tracks cache outcomes: hits, misses, expirations, and absorbed storage failures.

use serde::Serialize;

// == Cache Stats ==
/// Counters for a single cache instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of `get` calls that returned a value
    pub hits: u64,
    /// Number of `get` calls that returned nothing (absent, expired, or unreadable)
    pub misses: u64,
    /// Number of entries evicted by `get` because their TTL had elapsed
    pub expirations: u64,
    /// Number of storage errors absorbed by the cache
    pub storage_failures: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    pub fn record_storage_failure(&mut self) {
        self.storage_failures += 1;
    }
}
