//! Lock-protected hash map backing [`OrderedMap`](crate::OrderedMap).
//!
//! [`ConcurrentStore`] wraps a `HashMap` in a [`parking_lot::RwLock`]. Every
//! method takes the lock for its own duration only and never runs caller code
//! while holding it, so visitors and comparators may re-enter the store.
//!
//! # Hasher selection
//!
//! - default: `std`'s SipHash (`RandomState`), HashDoS-resistant
//! - `fxhash` feature: `rustc_hash::FxBuildHasher`
//! - `ahash` feature: `ahash::RandomState`
//!
//! `fxhash` takes precedence when both are enabled.

use parking_lot::RwLock;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Hasher builder used by the store.
#[cfg(feature = "fxhash")]
pub type DefaultBuildHasher = rustc_hash::FxBuildHasher;

/// Hasher builder used by the store.
#[cfg(all(feature = "ahash", not(feature = "fxhash")))]
pub type DefaultBuildHasher = ahash::RandomState;

/// Hasher builder used by the store.
#[cfg(not(any(feature = "fxhash", feature = "ahash")))]
pub type DefaultBuildHasher = std::collections::hash_map::RandomState;

type Table<K, V> = HashMap<K, V, DefaultBuildHasher>;

/// A hash map that is safe to share between threads without external locking.
///
/// Each method is atomic on its own. Sequences of calls are not.
pub struct ConcurrentStore<K, V> {
    table: RwLock<Table<K, V>>,
}

impl<K, V> ConcurrentStore<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table::default()),
        }
    }

    /// Inserts or overwrites an entry, returning the previous value.
    pub fn store(&self, key: K, value: V) -> Option<V> {
        self.table.write().insert(key, value)
    }

    /// Inserts every pair under a single write lock.
    pub fn store_all<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut table = self.table.write();
        for (key, value) in entries {
            table.insert(key, value);
        }
    }

    /// Returns a clone of the value stored under `key`.
    pub fn load<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.table.read().get(key).cloned()
    }

    /// Returns whether an entry exists for `key`.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.read().contains_key(key)
    }

    /// Removes the entry for `key`, returning its value if there was one.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.write().remove(key)
    }

    /// Replaces the whole content with `entries`.
    ///
    /// The new table is built before the lock is taken, so readers observe
    /// either the old content or the new one, never a mix.
    pub fn replace<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let fresh: Table<K, V> = entries.into_iter().collect();
        *self.table.write() = fresh;
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.table.write().clear();
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Returns whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// Clones every key currently present, in unspecified order.
    pub fn snapshot_keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.table.read().keys().cloned().collect()
    }

    /// Clones every entry currently present, in unspecified order.
    pub fn snapshot_entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.table
            .read()
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl<K, V> Default for ConcurrentStore<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::thread;

    #[rstest]
    fn test_store_and_load() {
        let store = ConcurrentStore::new();
        assert_eq!(store.store("a".to_string(), 1), None);
        assert_eq!(store.store("a".to_string(), 2), Some(1));
        assert_eq!(store.load("a"), Some(2));
        assert_eq!(store.load("b"), None);
    }

    #[rstest]
    fn test_remove_missing_key_is_noop() {
        let store: ConcurrentStore<String, i32> = ConcurrentStore::new();
        store.store("a".to_string(), 1);
        assert_eq!(store.remove("missing"), None);
        assert_eq!(store.len(), 1);
    }

    #[rstest]
    fn test_replace_discards_previous_content() {
        let store = ConcurrentStore::new();
        store.store(1, "one");
        store.replace([(2, "two"), (3, "three")]);

        let mut keys = store.snapshot_keys();
        keys.sort_unstable();
        assert_eq!(keys, vec![2, 3]);
        assert!(!store.contains(&1));
    }

    #[rstest]
    fn test_clear_empties_store() {
        let store = ConcurrentStore::new();
        store.store_all([(1, 1), (2, 2)]);
        store.clear();
        assert!(store.is_empty());
    }

    #[rstest]
    fn test_concurrent_writers() {
        let store = Arc::new(ConcurrentStore::new());

        let handles: Vec<_> = (0..8)
            .map(|thread_index| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for offset in 0..100 {
                        store.store(thread_index * 100 + offset, offset);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("Thread panicked");
        }

        assert_eq!(store.len(), 800);
    }
}
