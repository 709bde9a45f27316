//! # Evicting LRU
//!
//! Bounded map that hands every entry it drops for capacity back to the
//! caller of the insertion that caused it. Callers holding the map behind a
//! lock release it before acting on evicted entries.

use lru::LruCache;
use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;

pub struct EvictingLru<K: Hash + Eq, V> {
    cache: LruCache<K, V>,
}

impl<K: Hash + Eq + Clone, V> EvictingLru<K, V> {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Insert or replace, making `key` the most recent entry.
    ///
    /// Returns the entry dropped for capacity. Replacing an existing key
    /// evicts nothing.
    #[must_use = "evicted entries must be released by the caller"]
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        match self.cache.push(key.clone(), value) {
            Some((evicted_key, evicted_value)) if evicted_key != key => {
                Some((evicted_key, evicted_value))
            }
            _ => None,
        }
    }

    /// Entry for `key`, inserting `default()` if missing. Marks it recent.
    ///
    /// Also returns the entry dropped to make room, if any.
    pub fn get_or_insert_mut<F>(&mut self, key: K, default: F) -> (&mut V, Option<(K, V)>)
    where
        F: FnOnce() -> V,
    {
        let evicted = if self.cache.contains(&key) {
            None
        } else {
            self.put(key.clone(), default())
        };
        match self.cache.get_mut(&key) {
            Some(value) => (value, evicted),
            None => unreachable!("entry inserted above"),
        }
    }

    /// Mutable access that marks `key` recent.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.cache.get_mut(key)
    }

    /// Read without touching recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.cache.peek(key)
    }

    /// Mark `key` recent. Returns `false` if absent.
    pub fn touch(&mut self, key: &K) -> bool {
        self.cache.get(key).is_some()
    }

    /// Remove `key`. Not an eviction.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.cache.pop(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.cache.contains(key)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    /// Drain all entries, most recent first.
    pub fn drain(&mut self) -> Vec<(K, V)> {
        let mut drained = Vec::with_capacity(self.cache.len());
        while let Some(entry) = self.cache.pop_lru() {
            drained.push(entry);
        }
        drained.reverse();
        drained
    }
}

impl<K: Hash + Eq + fmt::Debug, V> fmt::Debug for EvictingLru<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvictingLru")
            .field("len", &self.cache.len())
            .field("cap", &self.cache.cap())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lru(capacity: usize) -> EvictingLru<String, u32> {
        EvictingLru::new(capacity)
    }

    #[test]
    fn test_evicts_least_recent() {
        let mut lru = lru(2);
        assert_eq!(lru.put("a".into(), 1), None);
        assert_eq!(lru.put("b".into(), 2), None);

        assert_eq!(lru.put("c".into(), 3), Some(("a".to_string(), 1)));
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn test_touch_protects_entry() {
        let mut lru = lru(2);
        let _ = lru.put("a".into(), 1);
        let _ = lru.put("b".into(), 2);
        assert!(lru.touch(&"a".to_string()));

        assert_eq!(lru.put("c".into(), 3), Some(("b".to_string(), 2)));
        assert!(lru.contains(&"a".to_string()));
    }

    #[test]
    fn test_peek_does_not_protect_entry() {
        let mut lru = lru(2);
        let _ = lru.put("a".into(), 1);
        let _ = lru.put("b".into(), 2);
        assert_eq!(lru.peek(&"a".to_string()), Some(&1));

        assert_eq!(lru.put("c".into(), 3), Some(("a".to_string(), 1)));
    }

    #[test]
    fn test_replace_and_remove_evict_nothing() {
        let mut lru = lru(1);
        assert_eq!(lru.put("a".into(), 1), None);
        assert_eq!(lru.put("a".into(), 2), None);
        assert_eq!(lru.remove(&"a".to_string()), Some(2));
        assert!(lru.drain().is_empty());
    }

    #[test]
    fn test_get_or_insert_mut() {
        let mut lru = lru(1);
        let (_, evicted) = lru.get_or_insert_mut("a".into(), || 1);
        assert!(evicted.is_none());
        let (value, evicted) = lru.get_or_insert_mut("a".into(), || 99);
        *value += 10;
        assert!(evicted.is_none());
        assert_eq!(lru.peek(&"a".to_string()), Some(&11));

        let (value, evicted) = lru.get_or_insert_mut("b".into(), || 2);
        assert_eq!(*value, 2);
        assert_eq!(evicted, Some(("a".to_string(), 11)));
    }

    #[test]
    fn test_drain_most_recent_first() {
        let mut lru = lru(3);
        let _ = lru.put("a".into(), 1);
        let _ = lru.put("b".into(), 2);
        assert!(lru.touch(&"a".to_string()));

        assert_eq!(
            lru.drain(),
            vec![("a".to_string(), 1), ("b".to_string(), 2)]
        );
        assert!(lru.is_empty());
    }

    #[test]
    fn test_zero_capacity_clamped() {
        assert_eq!(lru(0).capacity(), 1);
    }
}
