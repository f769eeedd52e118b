// Rendered-sheet cache.
//
// Exports are often re-triggered with unchanged data. `WorkbookCache`
// keeps the rendered bytes keyed by a hash of the sheet contents, bounded
// both in size and in age. It is owned and passed around by the caller; the
// aggregation functions never see it.
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone)]
struct Entry {
    bytes: Vec<u8>,
    inserted_at: Instant,
}

#[derive(Debug)]
pub struct WorkbookCache {
    capacity: usize,
    ttl: Duration,
    entries: HashMap<u64, Entry>,
}

/// Content key for a sheet: its name plus its serialized rows.
pub fn content_key(sheet: &str, serialized_rows: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    sheet.hash(&mut hasher);
    serialized_rows.hash(&mut hasher);
    hasher.finish()
}

impl WorkbookCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity,
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&mut self, key: u64) -> Option<&[u8]> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&mut self, key: u64, now: Instant) -> Option<&[u8]> {
        let expired = self
            .entries
            .get(&key)
            .is_some_and(|e| now.saturating_duration_since(e.inserted_at) >= self.ttl);
        if expired {
            debug!(key, "dropping expired sheet");
            self.entries.remove(&key);
            return None;
        }
        self.entries.get(&key).map(|e| e.bytes.as_slice())
    }

    pub fn insert(&mut self, key: u64, bytes: Vec<u8>) {
        self.insert_at(key, bytes, Instant::now())
    }

    /// Store `bytes`, first purging expired entries and then, if still full,
    /// evicting the oldest insertion. A zero capacity stores nothing.
    pub fn insert_at(&mut self, key: u64, bytes: Vec<u8>, now: Instant) {
        if self.capacity == 0 {
            return;
        }
        let ttl = self.ttl;
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.inserted_at) < ttl);
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| *k);
            if let Some(k) = oldest {
                debug!(key = k, "evicting oldest sheet");
                self.entries.remove(&k);
            }
        }
        self.entries.insert(
            key,
            Entry {
                bytes,
                inserted_at: now,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_expire_after_ttl() {
        let start = Instant::now();
        let mut cache = WorkbookCache::new(4, Duration::from_secs(60));
        cache.insert_at(1, b"a".to_vec(), start);
        assert_eq!(cache.get_at(1, start + Duration::from_secs(59)), Some(&b"a"[..]));
        assert_eq!(cache.get_at(1, start + Duration::from_secs(60)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn capacity_evicts_oldest() {
        let start = Instant::now();
        let mut cache = WorkbookCache::new(2, Duration::from_secs(600));
        cache.insert_at(1, b"one".to_vec(), start);
        cache.insert_at(2, b"two".to_vec(), start + Duration::from_secs(1));
        cache.insert_at(3, b"three".to_vec(), start + Duration::from_secs(2));
        let now = start + Duration::from_secs(3);
        assert_eq!(cache.len(), 2);
        assert!(cache.get_at(1, now).is_none());
        assert!(cache.get_at(2, now).is_some());
        assert!(cache.get_at(3, now).is_some());
    }

    #[test]
    fn replacing_a_key_does_not_evict() {
        let start = Instant::now();
        let mut cache = WorkbookCache::new(1, Duration::from_secs(600));
        cache.insert_at(7, b"old".to_vec(), start);
        cache.insert_at(7, b"new".to_vec(), start);
        assert_eq!(cache.get_at(7, start), Some(&b"new"[..]));
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache = WorkbookCache::new(0, Duration::from_secs(600));
        cache.insert(1, b"x".to_vec());
        assert!(cache.is_empty());
    }

    #[test]
    fn content_key_depends_on_sheet_and_rows() {
        assert_eq!(content_key("a", "rows"), content_key("a", "rows"));
        assert_ne!(content_key("a", "rows"), content_key("b", "rows"));
        assert_ne!(content_key("a", "rows"), content_key("a", "other"));
    }
}
