//! Cache Store Module
//!
//! File content cache combining HashMap storage with recency tracking and TTL expiration.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheCounters, CacheEntry, CacheStats, EntryStats, RecencyOrder};

// == Cache Store ==
/// Single-threaded cache engine. Every operation takes `&mut self`;
/// [`ContentCache`] wraps it behind a lock for shared use.
#[derive(Debug)]
pub struct CacheStore {
    /// Path to entry storage
    entries: HashMap<String, CacheEntry>,
    /// Access order for eviction
    order: RecencyOrder,
    /// Lookup counters
    counters: CacheCounters,
    /// Maximum number of entries held at once
    max_size: usize,
    /// Age after which an entry is no longer served
    ttl: Duration,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    ///
    /// # Arguments
    /// * `max_size` - Capacity in entries, raised to 1 if zero
    /// * `ttl` - Entry lifetime measured from insertion
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: RecencyOrder::new(),
            counters: CacheCounters::new(),
            max_size: max_size.max(1),
            ttl,
        }
    }

    // == Get ==
    /// Looks up a path.
    ///
    /// Expired entries are dropped and reported as a miss. A hit bumps the
    /// entry's hit count and marks it most recently used.
    pub fn get(&mut self, path: &str) -> Option<CacheEntry> {
        let ttl = self.ttl;
        let expired = match self.entries.get_mut(path) {
            None => {
                self.counters.record_miss();
                return None;
            }
            Some(entry) if entry.is_expired(ttl) => true,
            Some(entry) => {
                entry.hit_count += 1;
                false
            }
        };

        if expired {
            self.entries.remove(path);
            self.order.forget(path);
            self.counters.record_miss();
            debug!(path, "cache entry expired");
            return None;
        }

        self.counters.record_hit();
        self.order.promote(path);
        self.entries.get(path).cloned()
    }

    // == Set ==
    /// Stores file content, replacing any previous entry for the path.
    ///
    /// The entry gets a fresh insertion time and a zero hit count. Inserting a
    /// new path into a full store evicts the least recently used entry first.
    pub fn set(
        &mut self,
        path: &str,
        content: impl Into<Arc<str>>,
        size: u64,
        source_modified: SystemTime,
    ) {
        let is_overwrite = self.entries.contains_key(path);

        if !is_overwrite && self.entries.len() >= self.max_size {
            if let Some(evicted) = self.order.pop_least_recent() {
                self.entries.remove(&evicted);
                self.counters.record_eviction();
                debug!(path = %evicted, "evicted least recently used entry");
            }
        }

        self.entries
            .insert(path.to_string(), CacheEntry::new(content, size, source_modified));
        self.order.promote(path);
    }

    // == Remove ==
    /// Drops the entry for a path. Returns whether one was present.
    pub fn remove(&mut self, path: &str) -> bool {
        if self.entries.remove(path).is_some() {
            self.order.forget(path);
            true
        } else {
            false
        }
    }

    /// Removes every entry stored at or below `dir`, returning how many went.
    pub fn remove_tree(&mut self, dir: &Path) -> usize {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| Path::new(key.as_str()).starts_with(dir))
            .cloned()
            .collect();
        for key in &doomed {
            self.remove(key);
        }
        doomed.len()
    }

    // == Clear ==
    /// Drops all entries and resets hits, misses and evictions.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.counters = CacheCounters::new();
    }

    // == Invalidate Stale ==
    /// Drops the entry for `path` if the file changed after it was filled.
    ///
    /// Returns true only when an entry existed and its recorded modification
    /// time is strictly older than `observed_modified`. Does not touch recency
    /// or counters.
    pub fn invalidate_stale(&mut self, path: &str, observed_modified: SystemTime) -> bool {
        let stale = self
            .entries
            .get(path)
            .is_some_and(|entry| entry.is_stale(observed_modified));

        if stale {
            self.remove(path);
            debug!(path, "invalidated stale cache entry");
        }
        stale
    }

    // == Stats ==
    /// Builds a statistics report, with per-entry detail when `detailed` is set.
    pub fn stats(&self, detailed: bool) -> CacheStats {
        let stats = CacheStats::new(self.entries.len(), self.max_size, self.counters, self.ttl);
        if !detailed {
            return stats;
        }

        let entries = self
            .order
            .iter()
            .filter_map(|path| {
                self.entries.get(path).map(|entry| {
                    EntryStats::new(
                        path,
                        entry.size,
                        entry.source_modified,
                        entry.cached_at,
                        entry.hit_count,
                    )
                })
            })
            .collect();
        stats.with_entries(entries)
    }

    /// Returns whether a live or expired entry is stored for the path.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

// == Content Cache ==
/// Thread-safe file content cache shared by all tool handlers.
///
/// Each call takes the lock exactly once, so a call observes and leaves the
/// store in a consistent state.
#[derive(Debug)]
pub struct ContentCache {
    inner: Mutex<CacheStore>,
}

impl ContentCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(CacheStore::new(max_size, ttl)),
        }
    }

    pub fn get(&self, path: &str) -> Option<CacheEntry> {
        self.inner.lock().get(path)
    }

    pub fn set(&self, path: &str, content: impl Into<Arc<str>>, size: u64, modified: SystemTime) {
        self.inner.lock().set(path, content, size, modified);
    }

    pub fn remove(&self, path: &str) -> bool {
        self.inner.lock().remove(path)
    }

    pub fn remove_tree(&self, dir: &Path) -> usize {
        self.inner.lock().remove_tree(dir)
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn invalidate_stale(&self, path: &str, observed_modified: SystemTime) -> bool {
        self.inner.lock().invalidate_stale(path, observed_modified)
    }

    pub fn stats(&self, detailed: bool) -> CacheStats {
        self.inner.lock().stats(detailed)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}
