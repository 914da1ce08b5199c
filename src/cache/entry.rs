//! Cache Entry Module
//!
//! Defines a cached file body together with the metadata used for freshness checks.

use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A file's content as it was read at fill time.
///
/// `content` is shared, so handing an entry back from a lookup never copies the file body.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Full text content read from the file
    pub content: Arc<str>,
    /// Byte length of `content` at fill time
    pub size: u64,
    /// Modification time of the file observed when the entry was filled
    pub source_modified: SystemTime,
    /// Wall-clock insertion time, reported in statistics
    pub cached_at: DateTime<Utc>,
    /// Monotonic insertion time, used for TTL expiry
    pub(crate) inserted: Instant,
    /// Number of successful lookups since insertion
    pub hit_count: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a fresh entry stamped with the current time and a zero hit count.
    pub fn new(content: impl Into<Arc<str>>, size: u64, source_modified: SystemTime) -> Self {
        Self {
            content: content.into(),
            size,
            source_modified,
            cached_at: Utc::now(),
            inserted: Instant::now(),
            hit_count: 0,
        }
    }

    // == Expiry ==
    /// Returns true once strictly more than `ttl` has elapsed since insertion.
    ///
    /// An entry exactly `ttl` old is still served.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.is_expired_at(Instant::now(), ttl)
    }

    /// Expiry check against an explicit instant.
    pub fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.inserted) > ttl
    }

    // == Staleness ==
    /// Returns true if the file on disk was modified after this entry was filled.
    pub fn is_stale(&self, observed_modified: SystemTime) -> bool {
        self.source_modified < observed_modified
    }

    /// Time since insertion.
    pub fn age(&self) -> Duration {
        self.inserted.elapsed()
    }
}
