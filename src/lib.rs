//! # sortable-map
//!
//! A concurrency-safe map that iterates in a caller-defined order and
//! round-trips through JSON without losing that order.
//!
//! ## Overview
//!
//! Standard hash maps give fast lookup but no useful iteration order; sorted
//! maps fix the order to the key type's `Ord`. [`OrderedMap`] keeps unordered
//! storage and applies a pluggable [`Comparator`] whenever an ordered view is
//! needed:
//!
//! - **Storage**: a lock-protected hash map, safe to share across threads
//! - **Ordering**: keys are snapshotted and sorted on every traversal
//! - **Encoding**: JSON objects with fields in comparator order
//! - **Decoding**: JSON objects with text keys, falling back to integer keys
//!
//! ## Feature Flags
//!
//! - `serde` (default): `JsonCodec` and the `encode`/`decode` shorthands
//! - `fxhash`: use `rustc-hash` as the store's hasher
//! - `ahash`: use `ahash` as the store's hasher
//!
//! ## Example
//!
//! ```rust
//! use sortable_map::{Comparator, MapKey, OrderedMap};
//! use serde_json::Value;
//!
//! let numeric = Comparator::by_key(|key: &MapKey| key.to_string().parse::<i64>().unwrap_or(0));
//! let map: OrderedMap<MapKey, Value> =
//!     OrderedMap::from_json(br#"{"1":"ha1","2":"ha2","10":"h10","3":"ha3"}"#, numeric).unwrap();
//!
//! map.set(MapKey::from("1"), Value::from("X"));
//! map.delete(&MapKey::from("2"));
//!
//! assert_eq!(map.get(&MapKey::from("10")).unwrap(), "h10");
//! assert_eq!(map.encode().unwrap(), r#"{"1":"X","3":"ha3","10":"h10"}"#);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use sortable_map::prelude::*;
///
/// let map: OrderedMap<String, i32> = OrderedMap::new();
/// assert!(map.is_empty());
/// ```
pub mod prelude {
    pub use crate::codec::{ValueCodec, ValueDecoder, ValueEncoder};
    pub use crate::comparator::Comparator;
    pub use crate::error::{OrderedMapError, Result};
    pub use crate::key::{DecodeKey, KeyKind, MapKey, SourceMapping};
    pub use crate::ordered_map::OrderedMap;

    #[cfg(feature = "serde")]
    pub use crate::codec::JsonCodec;
}

pub mod codec;
pub mod comparator;
pub mod error;
pub mod key;
mod ordered_map;
mod sort;
pub mod store;

pub use comparator::Comparator;
pub use error::{CodecError, OrderedMapError, Result};
pub use key::{DecodeKey, KeyKind, MapKey, SourceMapping};
pub use ordered_map::{NULL_BODY, OrderedMap, encode_optional};
