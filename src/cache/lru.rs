//! Recency Order Module
//!
//! Tracks path access order for least-recently-used eviction.

use std::collections::VecDeque;

// == Recency Order ==
/// Access order of cached paths.
///
/// Paths are stored in a VecDeque where:
/// - Front = Most recently used
/// - Back = Least recently used
///
/// Promotion is linear in the number of tracked paths, which stays small
/// because the cache is bounded by entry count.
#[derive(Debug, Default)]
pub struct RecencyOrder {
    order: VecDeque<String>,
}

impl RecencyOrder {
    /// Creates an empty order.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Promote ==
    /// Marks a path as most recently used, inserting it if untracked.
    pub fn promote(&mut self, path: &str) {
        self.forget(path);
        self.order.push_front(path.to_string());
    }

    // == Forget ==
    /// Stops tracking a path. No-op if it is not tracked.
    pub fn forget(&mut self, path: &str) {
        if let Some(pos) = self.order.iter().position(|p| p == path) {
            self.order.remove(pos);
        }
    }

    // == Pop Least Recent ==
    /// Removes and returns the least recently used path.
    pub fn pop_least_recent(&mut self) -> Option<String> {
        self.order.pop_back()
    }

    /// The least recently used path, without removing it.
    pub fn least_recent(&self) -> Option<&str> {
        self.order.back().map(String::as_str)
    }

    /// Iterates paths from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_is_empty() {
        let order = RecencyOrder::new();
        assert!(order.is_empty());
        assert_eq!(order.least_recent(), None);
    }

    #[test]
    fn test_first_promoted_is_least_recent() {
        let mut order = RecencyOrder::new();
        order.promote("/a");
        order.promote("/b");
        order.promote("/c");

        assert_eq!(order.len(), 3);
        assert_eq!(order.least_recent(), Some("/a"));
    }

    #[test]
    fn test_promote_existing_moves_to_front() {
        let mut order = RecencyOrder::new();
        order.promote("/a");
        order.promote("/b");
        order.promote("/c");
        order.promote("/a");

        assert_eq!(order.len(), 3);
        assert_eq!(order.iter().collect::<Vec<_>>(), vec!["/a", "/c", "/b"]);
        assert_eq!(order.pop_least_recent(), Some("/b".to_string()));
    }

    #[test]
    fn test_pop_drains_in_recency_order() {
        let mut order = RecencyOrder::new();
        // a, b, c then touch a, c, b => front=[b, c, a]=back
        for p in ["/a", "/b", "/c", "/a", "/c", "/b"] {
            order.promote(p);
        }

        assert_eq!(order.pop_least_recent(), Some("/a".to_string()));
        assert_eq!(order.pop_least_recent(), Some("/c".to_string()));
        assert_eq!(order.pop_least_recent(), Some("/b".to_string()));
        assert_eq!(order.pop_least_recent(), None);
    }

    #[test]
    fn test_forget_unknown_path_is_noop() {
        let mut order = RecencyOrder::new();
        order.promote("/a");
        order.forget("/nope");
        assert_eq!(order.len(), 1);
    }

    #[test]
    fn test_forget_and_clear() {
        let mut order = RecencyOrder::new();
        order.promote("/a");
        order.promote("/b");
        order.forget("/a");
        assert_eq!(order.iter().collect::<Vec<_>>(), vec!["/b"]);

        order.clear();
        assert!(order.is_empty());
    }

    #[test]
    fn test_repeated_promotion_keeps_single_slot() {
        let mut order = RecencyOrder::new();
        order.promote("/a");
        order.promote("/a");
        order.promote("/a");
        assert_eq!(order.len(), 1);
    }
}
