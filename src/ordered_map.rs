//! Concurrent map with comparator-driven iteration order.
//!
//! This module provides [`OrderedMap`], a key/value map that is safe to share
//! between threads and that visits its entries in the order defined by a
//! caller-supplied [`Comparator`].
//!
//! # Overview
//!
//! - Storage is an unordered hash map behind a read/write lock.
//! - Insertion order is not tracked. Every ordered view snapshots the current
//!   keys and sorts them, so insertions and deletions show up in the next
//!   traversal with no bookkeeping.
//! - [`encode`](OrderedMap::encode) writes a JSON object whose fields follow
//!   the comparator order; [`decode`](OrderedMap::decode) reads one back,
//!   inferring whether the keys are text or integers.
//!
//! | Operation        | Cost           |
//! |------------------|----------------|
//! | `get`/`set`      | O(1) expected  |
//! | `delete`         | O(1) expected  |
//! | `len`            | O(1)           |
//! | `ordered_keys`   | O(n log n)     |
//! | `traverse`       | O(n log n)     |
//! | `encode`         | O(n log n)     |
//!
//! `len` reads the table's entry count under the read lock rather than
//! counting a traversal; both give the same number at any instant.
//!
//! # Consistency
//!
//! Each primitive operation is atomic. Composite operations are not: the key
//! snapshot taken by `ordered_keys` and the per-key value loads that follow in
//! `traverse` and `encode` may interleave with other writers. A key removed in
//! that window is reported as absent (`None` to a visitor, `null` when
//! encoding).
//!
//! # Examples
//!
//! ```rust
//! use sortable_map::{Comparator, OrderedMap};
//!
//! let map = OrderedMap::with_comparator(Comparator::by_key(|key: &String| {
//!     key.parse::<i64>().unwrap_or(i64::MAX)
//! }));
//! map.set("10".to_string(), "ten");
//! map.set("2".to_string(), "two");
//! map.set("1".to_string(), "one");
//!
//! assert_eq!(map.ordered_keys(), vec!["1", "2", "10"]);
//! ```

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::ops::ControlFlow;

use static_assertions::assert_impl_all;
use tracing::{debug, trace};

use crate::codec::{ValueDecoder, ValueEncoder};
use crate::comparator::Comparator;
use crate::error::{OrderedMapError, Result};
use crate::key::{DecodeKey, MapKey, SourceMapping};
use crate::sort::sort_by_less;
use crate::store::ConcurrentStore;

/// Literal written for an absent map or a failed encode.
pub const NULL_BODY: &str = "null";

/// A thread-safe map whose iteration order is defined by a [`Comparator`].
///
/// All methods take `&self`; share the map across threads with
/// `Arc<OrderedMap<K, V>>`.
///
/// # Examples
///
/// ```rust
/// use sortable_map::OrderedMap;
///
/// let map: OrderedMap<String, i32> = OrderedMap::new();
/// map.set("b".to_string(), 2);
/// map.set("a".to_string(), 1);
/// map.delete("missing");
///
/// assert_eq!(map.get("a").unwrap(), 1);
/// assert_eq!(map.ordered_keys(), vec!["a", "b"]);
/// ```
pub struct OrderedMap<K, V> {
    entries: ConcurrentStore<K, V>,
    comparator: Comparator<K>,
}

assert_impl_all!(OrderedMap<MapKey, String>: Send, Sync);
assert_impl_all!(OrderedMap<i64, Vec<u8>>: Send, Sync);

// =============================================================================
// Construction
// =============================================================================

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash,
{
    /// Creates an empty map ordered by the `Display` text of its keys.
    ///
    /// Text order is not numeric order: `"10"` sorts before `"2"`.
    #[must_use]
    pub fn new() -> Self
    where
        K: fmt::Display + 'static,
    {
        Self::with_comparator(Comparator::by_text())
    }

    /// Creates an empty map ordered by `comparator`.
    pub fn with_comparator(comparator: Comparator<K>) -> Self {
        Self {
            entries: ConcurrentStore::new(),
            comparator,
        }
    }

    /// Creates an empty map, falling back to text order when `comparator` is `None`.
    pub fn with_optional_comparator(comparator: Option<Comparator<K>>) -> Self
    where
        K: fmt::Display + 'static,
    {
        Self::with_comparator(comparator.unwrap_or_else(Comparator::by_text))
    }

    /// Returns the comparator that orders this map.
    pub const fn comparator(&self) -> &Comparator<K> {
        &self.comparator
    }
}

// =============================================================================
// Bulk Loading
// =============================================================================

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash,
{
    /// Replaces the whole content with `mapping`.
    ///
    /// Prior entries are discarded, not merged. The swap is atomic: concurrent
    /// readers see either the old content or the new one.
    ///
    /// # Errors
    ///
    /// - [`OrderedMapError::InvalidInput`] if `mapping` is `None`.
    /// - [`OrderedMapError::UnsupportedKeyShape`] if a key has no counterpart
    ///   in `K` (see [`DecodeKey`]).
    ///
    /// The map is left untouched in both cases.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::collections::HashMap;
    /// use sortable_map::{MapKey, OrderedMap, OrderedMapError, SourceMapping};
    ///
    /// let map: OrderedMap<MapKey, &str> = OrderedMap::new();
    /// let mapping = SourceMapping::Integer(HashMap::from([(2, "b"), (1, "a")]));
    /// map.load_from(Some(mapping)).unwrap();
    /// assert_eq!(map.get(&MapKey::Integer(1)).unwrap(), "a");
    ///
    /// assert!(matches!(map.load_from(None), Err(OrderedMapError::InvalidInput)));
    /// ```
    pub fn load_from(&self, mapping: Option<SourceMapping<V>>) -> Result<()>
    where
        K: DecodeKey,
    {
        let mapping = mapping.ok_or(OrderedMapError::InvalidInput)?;
        let kind = mapping.kind();
        debug!(%kind, entries = mapping.len(), "loading mapping");
        let entries = mapping.into_entries::<K>().ok_or_else(|| {
            debug!(%kind, "mapping keys do not convert to the key type");
            OrderedMapError::UnsupportedKeyShape
        })?;
        self.entries.replace(entries);
        Ok(())
    }

    /// Replaces the whole content with a text-keyed mapping.
    ///
    /// # Errors
    ///
    /// See [`load_from`](Self::load_from).
    pub fn load_text_keyed(&self, mapping: Option<HashMap<String, V>>) -> Result<()>
    where
        K: DecodeKey,
    {
        self.load_from(mapping.map(SourceMapping::Text))
    }

    /// Replaces the whole content with an integer-keyed mapping.
    ///
    /// # Errors
    ///
    /// See [`load_from`](Self::load_from).
    pub fn load_integer_keyed(&self, mapping: Option<HashMap<i64, V>>) -> Result<()>
    where
        K: DecodeKey,
    {
        self.load_from(mapping.map(SourceMapping::Integer))
    }
}

// =============================================================================
// Point Operations
// =============================================================================

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash,
{
    /// Inserts or overwrites one entry, returning the previous value.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        self.entries.store(key, value)
    }

    /// Inserts entries from a flat sequence of alternating keys and values.
    ///
    /// The sequence is validated before anything is stored, and all pairs are
    /// then written under one lock.
    ///
    /// # Errors
    ///
    /// Returns [`OrderedMapError::MalformedArguments`] if the sequence has an
    /// odd number of items. Nothing is stored in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sortable_map::{OrderedMap, OrderedMapError};
    ///
    /// let map: OrderedMap<String, String> = OrderedMap::new();
    /// map.set_flat(["a", "1", "b", "2"]).unwrap();
    /// assert_eq!(map.len(), 2);
    ///
    /// let result = map.set_flat(["c", "3", "d"]);
    /// assert!(matches!(result, Err(OrderedMapError::MalformedArguments { length: 3 })));
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn set_flat<I, T>(&self, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<K> + Into<V>,
    {
        let items: Vec<T> = items.into_iter().collect();
        if items.len() % 2 != 0 {
            return Err(OrderedMapError::MalformedArguments {
                length: items.len(),
            });
        }

        let mut items = items.into_iter();
        let mut pairs = Vec::with_capacity(items.len() / 2);
        while let (Some(key), Some(value)) = (items.next(), items.next()) {
            pairs.push((Into::<K>::into(key), Into::<V>::into(value)));
        }
        self.entries.store_all(pairs);
        Ok(())
    }

    /// Returns a clone of the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderedMapError::KeyNotFound`] if there is no such entry.
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.entries.load(key).ok_or(OrderedMapError::KeyNotFound)
    }

    /// Removes the entry for `key`, returning its value.
    ///
    /// Removing a missing key does nothing and is not an error.
    pub fn delete<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(key)
    }

    /// Returns whether an entry exists for `key`.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

// =============================================================================
// Ordered Views
// =============================================================================

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Returns every key, sorted by the comparator.
    ///
    /// The keys are a weakly consistent snapshot: writes racing with this call
    /// may or may not be included. Keys that compare equal keep no particular
    /// order.
    pub fn ordered_keys(&self) -> Vec<K> {
        let mut keys = self.entries.snapshot_keys();
        sort_by_less(&mut keys, |left, right| self.comparator.less(left, right));
        trace!(keys = keys.len(), "sorted key snapshot");
        keys
    }

    /// Visits every entry in comparator order until `visitor` breaks.
    ///
    /// Values are loaded one at a time after the keys were snapshotted, so a
    /// value may be newer than the snapshot, and a key removed in between is
    /// passed with `None`. No lock is held while `visitor` runs; it may read
    /// or modify this map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::ops::ControlFlow;
    /// use sortable_map::OrderedMap;
    ///
    /// let map: OrderedMap<i64, &str> = [(3, "c"), (1, "a"), (2, "b")].into_iter().collect();
    /// let mut seen = Vec::new();
    /// map.traverse(|key, value| {
    ///     seen.push((*key, value));
    ///     if *key == 2 { ControlFlow::Break(()) } else { ControlFlow::Continue(()) }
    /// });
    /// assert_eq!(seen, vec![(1, Some("a")), (2, Some("b"))]);
    /// ```
    pub fn traverse<F>(&self, mut visitor: F)
    where
        F: FnMut(&K, Option<V>) -> ControlFlow<()>,
        V: Clone,
    {
        for key in self.ordered_keys() {
            let value = self.entries.load(&key);
            if visitor(&key, value).is_break() {
                return;
            }
        }
    }

    /// Returns all entries in comparator order.
    ///
    /// Keys removed between the snapshot and the value load are skipped.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        let mut entries = Vec::new();
        self.traverse(|key, value| {
            if let Some(value) = value {
                entries.push((key.clone(), value));
            }
            ControlFlow::Continue(())
        });
        entries
    }

    /// Returns all values in comparator order of their keys.
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.entries()
            .into_iter()
            .map(|(_, value)| value)
            .collect()
    }
}

// =============================================================================
// Encoding
// =============================================================================

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    /// Writes the map as a JSON object using `encoder` for the values.
    ///
    /// Fields appear in comparator order, with the key's `Display` text as the
    /// field name. Field names are not escaped, so keys should be simple
    /// scalars. An empty map encodes as `{}`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderedMapError::SerializationFailure`] with the first error
    /// raised by `encoder`. No partial output is returned.
    pub fn encode_with<E>(&self, encoder: &E) -> Result<String>
    where
        E: ValueEncoder<V>,
        V: Clone,
    {
        let mut body = String::from("{");
        for (index, key) in self.ordered_keys().into_iter().enumerate() {
            let value = self.entries.load(&key);
            let serialized = encoder
                .serialize_value(value.as_ref())
                .map_err(OrderedMapError::SerializationFailure)?;
            if index > 0 {
                body.push(',');
            }
            body.push('"');
            body.push_str(&key.to_string());
            body.push_str("\":");
            body.push_str(&serialized);
        }
        body.push('}');
        Ok(body)
    }

    /// Like [`encode_with`](Self::encode_with), but always yields a body.
    ///
    /// On failure the body is [`NULL_BODY`] and the error is returned
    /// alongside it, so the body is well-formed JSON either way.
    pub fn encode_or_null_with<E>(&self, encoder: &E) -> (String, Option<OrderedMapError>)
    where
        E: ValueEncoder<V>,
        V: Clone,
    {
        match self.encode_with(encoder) {
            Ok(body) => (body, None),
            Err(error) => (String::from(NULL_BODY), Some(error)),
        }
    }
}

/// Encodes a map that may be absent; `None` encodes as `null`.
///
/// # Errors
///
/// Propagates [`OrderedMap::encode_with`] errors.
pub fn encode_optional<K, V, E>(map: Option<&OrderedMap<K, V>>, encoder: &E) -> Result<String>
where
    K: Eq + Hash + Clone + fmt::Display,
    V: Clone,
    E: ValueEncoder<V>,
{
    map.map_or_else(|| Ok(String::from(NULL_BODY)), |map| map.encode_with(encoder))
}

// =============================================================================
// Decoding
// =============================================================================

impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + DecodeKey,
{
    /// Replaces the content with the JSON object in `input`.
    ///
    /// The map is emptied first. The input is then read as a text-keyed
    /// object; only if that fails, or its keys do not convert into `K`, is it
    /// read again with integer keys. JSON field names are always strings, so
    /// with [`JsonCodec`](crate::codec::JsonCodec) and text-capable keys
    /// (`String`, [`MapKey`]) the first attempt succeeds for every
    /// well-formed object. Both attempts are kept so that codecs with a
    /// stricter text-keyed parser still get integer keys.
    ///
    /// # Errors
    ///
    /// - [`OrderedMapError::UnsupportedKeyShape`] if neither attempt parses
    ///   into keys of type `K`; the map stays empty.
    /// - [`OrderedMapError::InvalidInput`] if the input is the literal `null`.
    pub fn decode_with<D>(&self, decoder: &D, input: &[u8]) -> Result<()>
    where
        D: ValueDecoder<V>,
    {
        self.entries.clear();

        match decoder.parse_text_keyed(input) {
            Ok(mapping) => match self.load_from(mapping.map(SourceMapping::Text)) {
                Err(OrderedMapError::UnsupportedKeyShape) => {
                    debug!("text keys do not fit the key type, retrying with integer keys");
                }
                outcome => return outcome,
            },
            Err(error) => {
                debug!(%error, "input is not a text-keyed object, retrying with integer keys");
            }
        }

        match decoder.parse_integer_keyed(input) {
            Ok(mapping) => self.load_from(mapping.map(SourceMapping::Integer)),
            Err(error) => {
                debug!(%error, "input is not an integer-keyed object either");
                Err(OrderedMapError::UnsupportedKeyShape)
            }
        }
    }

    /// Builds a map ordered by `comparator` from the JSON object in `input`.
    ///
    /// # Errors
    ///
    /// Same as [`decode_with`](Self::decode_with).
    pub fn from_json_with<D>(decoder: &D, input: &[u8], comparator: Comparator<K>) -> Result<Self>
    where
        D: ValueDecoder<V>,
    {
        let map = Self::with_comparator(comparator);
        map.decode_with(decoder, input)?;
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + Clone + fmt::Display,
    V: Clone + serde::Serialize,
{
    /// Writes the map as a JSON object, serializing values with `serde_json`.
    ///
    /// # Errors
    ///
    /// See [`encode_with`](Self::encode_with).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sortable_map::OrderedMap;
    ///
    /// let map: OrderedMap<String, i32> = OrderedMap::new();
    /// assert_eq!(map.encode().unwrap(), "{}");
    ///
    /// map.set("b".to_string(), 2);
    /// map.set("a".to_string(), 1);
    /// assert_eq!(map.encode().unwrap(), r#"{"a":1,"b":2}"#);
    /// ```
    pub fn encode(&self) -> Result<String> {
        self.encode_with(&crate::codec::JsonCodec)
    }

    /// Like [`encode`](Self::encode), but yields `null` as the body on failure.
    pub fn encode_or_null(&self) -> (String, Option<OrderedMapError>) {
        self.encode_or_null_with(&crate::codec::JsonCodec)
    }
}

#[cfg(feature = "serde")]
impl<K, V> OrderedMap<K, V>
where
    K: Eq + Hash + DecodeKey,
    V: serde::de::DeserializeOwned,
{
    /// Replaces the content with the JSON object in `input`, parsed with
    /// `serde_json`.
    ///
    /// # Errors
    ///
    /// See [`decode_with`](Self::decode_with).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sortable_map::{MapKey, OrderedMap, OrderedMapError};
    /// use serde_json::Value;
    ///
    /// let map: OrderedMap<MapKey, Value> = OrderedMap::new();
    /// map.decode(br#"{"b":true,"a":[1,2]}"#).unwrap();
    /// assert_eq!(map.encode().unwrap(), r#"{"a":[1,2],"b":true}"#);
    ///
    /// assert!(matches!(map.decode(b"[1,2,3]"), Err(OrderedMapError::UnsupportedKeyShape)));
    /// assert!(map.is_empty());
    /// ```
    pub fn decode(&self, input: &[u8]) -> Result<()> {
        self.decode_with(&crate::codec::JsonCodec, input)
    }

    /// Builds a map ordered by `comparator` from the JSON object in `input`.
    ///
    /// # Errors
    ///
    /// See [`decode_with`](Self::decode_with).
    pub fn from_json(input: &[u8], comparator: Comparator<K>) -> Result<Self> {
        Self::from_json_with(&crate::codec::JsonCodec, input, comparator)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl<K, V> Default for OrderedMap<K, V>
where
    K: Eq + Hash + fmt::Display + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Clone for OrderedMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Copies a snapshot of the entries; the comparator is shared.
    fn clone(&self) -> Self {
        let cloned = Self::with_comparator(self.comparator.clone());
        cloned.entries.replace(self.entries.snapshot_entries());
        cloned
    }
}

impl<K, V> fmt::Debug for OrderedMap<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.entries()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Eq + Hash + fmt::Display + 'static,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let map = Self::new();
        map.entries.store_all(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for OrderedMap<K, V>
where
    K: Eq + Hash,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries.store_all(iter);
    }
}

// =============================================================================
// Tests
// =============================================================================
