//! Cache Statistics Module
//!
//! Hit/miss/eviction counters and the serializable report built from them.

use std::time::{Duration, SystemTime};

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Counters ==
/// Running lookup counters. Reset only by a full clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// hits / (hits + misses), or 0.0 before any lookup.
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

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

// == Entry Stats ==
/// Point-in-time view of one cached file.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntryStats {
    pub path: String,
    pub size: u64,
    pub modified_time: DateTime<Utc>,
    pub cached_at: DateTime<Utc>,
    pub hits: u64,
}

impl EntryStats {
    pub fn new(
        path: impl Into<String>,
        size: u64,
        modified: SystemTime,
        cached_at: DateTime<Utc>,
        hits: u64,
    ) -> Self {
        Self {
            path: path.into(),
            size,
            modified_time: DateTime::<Utc>::from(modified),
            cached_at,
            hits,
        }
    }
}

// == Cache Stats ==
/// Owned statistics report returned by `ContentCache::stats`.
///
/// Built under the cache lock and detached from it; changing it has no effect on the cache.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    /// Live entry count
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub evictions: u64,
    /// TTL rendered as seconds, e.g. "300s"
    pub ttl: String,
    /// Per-entry detail, most recently used first; present only for detailed reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<EntryStats>>,
}

impl CacheStats {
    pub fn new(size: usize, max_size: usize, counters: CacheCounters, ttl: Duration) -> Self {
        Self {
            size,
            max_size,
            hits: counters.hits,
            misses: counters.misses,
            hit_rate: counters.hit_rate(),
            evictions: counters.evictions,
            ttl: format_ttl(ttl),
            entries: None,
        }
    }

    pub fn with_entries(mut self, entries: Vec<EntryStats>) -> Self {
        self.entries = Some(entries);
        self
    }
}

fn format_ttl(ttl: Duration) -> String {
    if ttl.subsec_millis() == 0 {
        format!("{}s", ttl.as_secs())
    } else {
        format!("{}ms", ttl.as_millis())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = CacheCounters::new();
        assert_eq!(counters.hits, 0);
        assert_eq!(counters.misses, 0);
        assert_eq!(counters.evictions, 0);
        assert_eq!(counters.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut counters = CacheCounters::new();
        counters.record_hit();
        counters.record_hit();
        counters.record_hit();
        counters.record_miss();
        assert_eq!(counters.hit_rate(), 0.75);
    }

    #[test]
    fn test_hit_rate_all_misses() {
        let mut counters = CacheCounters::new();
        counters.record_miss();
        counters.record_miss();
        assert_eq!(counters.hit_rate(), 0.0);
    }

    #[test]
    fn test_record_eviction() {
        let mut counters = CacheCounters::new();
        counters.record_eviction();
        counters.record_eviction();
        assert_eq!(counters.evictions, 2);
    }

    #[test]
    fn test_stats_serialize_camel_case_without_entries() {
        let stats = CacheStats::new(2, 500, CacheCounters::new(), Duration::from_secs(300));
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["maxSize"], 500);
        assert_eq!(json["hitRate"], 0.0);
        assert_eq!(json["ttl"], "300s");
        assert!(json.get("entries").is_none());
    }

    #[test]
    fn test_stats_serialize_entries() {
        let entry = EntryStats::new("/tmp/a.txt", 3, SystemTime::UNIX_EPOCH, Utc::now(), 4);
        let stats = CacheStats::new(1, 10, CacheCounters::new(), Duration::from_millis(1500))
            .with_entries(vec![entry]);
        let json = serde_json::to_value(&stats).unwrap();

        assert_eq!(json["ttl"], "1500ms");
        assert_eq!(json["entries"][0]["path"], "/tmp/a.txt");
        assert_eq!(json["entries"][0]["hits"], 4);
        assert!(json["entries"][0]["modifiedTime"].is_string());
        assert!(json["entries"][0]["cachedAt"].is_string());
    }
}
