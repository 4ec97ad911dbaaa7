//! Explicit key-value cache with optional time-to-live.
//!
//! Owned by whoever orchestrates repeated pipeline runs; there is no global
//! instance. Without a TTL entries live until invalidated or cleared.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| self.inserted_at.elapsed() >= ttl)
    }
}

/// In-memory cache keyed by `K`.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, CacheEntry<V>>,
    ttl: Option<Duration>,
}

impl<K: Eq + Hash, V> TtlCache<K, V> {
    /// Creates a cache; `ttl = None` disables expiry.
    #[must_use]
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Returns the value for `key` if present and not expired.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(self.ttl))
            .map(|entry| &entry.value)
    }

    /// Stores `value`, replacing any previous entry and restarting its TTL.
    pub fn insert(&mut self, key: K, value: V) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Drops one entry, returning its value if it was present.
    pub fn invalidate(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops expired entries and returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
        before - self.entries.len()
    }

    /// Number of stored entries, expired ones included until purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash, V> Default for TtlCache<K, V> {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_after_insert() {
        let mut cache = TtlCache::new(None);
        cache.insert(("usd", 500), "table");
        assert_eq!(cache.get(&("usd", 500)), Some(&"table"));
        assert_eq!(cache.get(&("eur", 500)), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_without_ttl_entries_never_expire() {
        let mut cache = TtlCache::default();
        cache.insert(1, "a");
        assert_eq!(cache.purge_expired(), 0);
        assert_eq!(cache.get(&1), Some(&"a"));
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let mut cache = TtlCache::new(Some(Duration::ZERO));
        cache.insert(1, "a");
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.purge_expired(), 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_long_ttl_keeps_entries() {
        let mut cache = TtlCache::new(Some(Duration::from_secs(3600)));
        cache.insert(1, "a");
        assert_eq!(cache.get(&1), Some(&"a"));
        assert_eq!(cache.ttl(), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let mut cache = TtlCache::new(None);
        cache.insert(1, "a");
        cache.insert(2, "b");

        assert_eq!(cache.invalidate(&1), Some("a"));
        assert_eq!(cache.invalidate(&1), None);
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&2), None);
    }

    #[test]
    fn test_insert_replaces_value() {
        let mut cache = TtlCache::new(None);
        cache.insert(1, "old");
        cache.insert(1, "new");
        assert_eq!(cache.get(&1), Some(&"new"));
        assert_eq!(cache.len(), 1);
    }
}
