//! Cache Module
//!
//! In-memory file content cache with TTL expiration, LRU eviction and staleness checks.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::RecencyOrder;
pub use stats::{CacheCounters, CacheStats, EntryStats};
pub use store::{CacheStore, ContentCache};

// == Public Constants ==
/// Default capacity in entries
pub const DEFAULT_CACHE_SIZE: usize = 500;

/// Default entry lifetime in seconds
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
