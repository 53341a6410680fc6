//! Fingerprint-keyed classification cache.
//!
//! Memoizes classification results by product fingerprint so repeated
//! elements cost at most one backend call for the page's lifetime. The cache
//! is LRU-bounded: capacity is configurable and eviction drops the least
//! recently used fingerprint, keeping memory flat on long-lived pages.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;

use super::types::Classification;
use crate::config::{DEFAULT_CACHE_CAPACITY, FINGERPRINT_SEPARATOR};
use crate::extract::ProductRecord;

/// Builds the cache fingerprint for a record: title joined to price.
///
/// Deterministic for identical inputs; records differing only in other
/// fields share a fingerprint by design.
pub fn fingerprint(record: &ProductRecord) -> String {
    format!(
        "{}{}{}",
        record.title.trim(),
        FINGERPRINT_SEPARATOR,
        record.price.trim()
    )
}

/// LRU-bounded map from fingerprint to the last classification seen for it.
pub struct ClassificationCache {
    entries: Mutex<LruCache<String, Classification>>,
}

impl ClassificationCache {
    /// Creates a cache holding at most `capacity` distinct fingerprints.
    /// A zero capacity falls back to the default bound.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CACHE_CAPACITY))
            .expect("default cache capacity is non-zero");
        ClassificationCache {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Looks up a fingerprint, refreshing its recency on hit.
    pub fn get(&self, key: &str) -> Option<Classification> {
        let mut entries = self.entries.lock().expect("classification cache poisoned");
        entries.get(key).cloned()
    }

    /// Stores a classification under `key`. Last write wins on duplicates.
    pub fn put(&self, key: String, value: Classification) {
        let mut entries = self.entries.lock().expect("classification cache poisoned");
        entries.put(key, value);
    }

    /// Number of cached fingerprints.
    pub fn len(&self) -> usize {
        self.entries.lock().expect("classification cache poisoned").len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Status;

    fn record(title: &str, price: &str) -> ProductRecord {
        ProductRecord {
            title: title.to_string(),
            price: price.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn fingerprint_is_stable_and_ignores_other_fields() {
        let a = ProductRecord {
            seller: "A".into(),
            ..record("Wireless Mouse", "$9.99")
        };
        let b = ProductRecord {
            seller: "B".into(),
            rating: "4.5".into(),
            ..record("Wireless Mouse", "$9.99")
        };
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_ne!(fingerprint(&a), fingerprint(&record("Wireless Mouse", "$8.99")));
    }

    #[test]
    fn capacity_bounds_distinct_fingerprints() {
        let cache = ClassificationCache::new(2);
        cache.put("a".into(), Classification::fallback("x"));
        cache.put("b".into(), Classification::fallback("x"));
        cache.put("c".into(), Classification::fallback("x"));
        assert_eq!(cache.len(), 2);
        // "a" was least recently used and should have been evicted.
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn last_write_wins_on_duplicate_fingerprint() {
        let cache = ClassificationCache::new(4);
        cache.put("k".into(), Classification::fallback("first"));
        let mut second = Classification::fallback("second");
        second.status = Status::Scam;
        cache.put("k".into(), second.clone());
        assert_eq!(cache.get("k"), Some(second));
    }
}
