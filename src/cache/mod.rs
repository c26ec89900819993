//! Cache Module
//!
//! TTL-based cache over a pluggable storage backend, with lazy expiry.

mod clock;
mod item;
mod stats;
mod store;


// Re-export public types
pub use clock::{system_clock, Clock, ManualClock};
pub use item::CacheItem;
pub use stats::CacheStats;
pub use store::TtlCache;

// == Public Constants ==
/// Default validity window: 24 hours.
pub const DEFAULT_TTL: std::time::Duration = std::time::Duration::from_secs(24 * 60 * 60);
