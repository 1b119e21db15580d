//! Value codecs.
//!
//! [`OrderedMap`](crate::OrderedMap) writes the object frame (braces, field
//! names, separators) itself and hands every value to a [`ValueEncoder`];
//! decoding parses the whole object through a [`ValueDecoder`]. The
//! codec is passed explicitly to
//! [`encode_with`](crate::OrderedMap::encode_with) and
//! [`decode_with`](crate::OrderedMap::decode_with); the `serde` feature adds
//! [`JsonCodec`], which the plain `encode`/`decode` methods use.

use std::collections::HashMap;

use crate::error::CodecError;

/// Serializes single values for [`OrderedMap::encode_with`](crate::OrderedMap::encode_with).
pub trait ValueEncoder<V> {
    /// Serializes one value. `None` stands for an entry that disappeared
    /// while the map was being encoded and must serialize as `null`.
    ///
    /// # Errors
    ///
    /// Returns the codec's own error if the value cannot be represented.
    fn serialize_value(&self, value: Option<&V>) -> Result<String, CodecError>;
}

/// Parses whole objects for [`OrderedMap::decode_with`](crate::OrderedMap::decode_with).
///
/// Both methods return `Ok(None)` when the input is the literal `null`, which
/// decoders report as [`OrderedMapError::InvalidInput`](crate::OrderedMapError::InvalidInput).
pub trait ValueDecoder<V> {
    /// Parses `input` as an object whose keys are kept as text.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` is not such an object.
    fn parse_text_keyed(&self, input: &[u8]) -> Result<Option<HashMap<String, V>>, CodecError>;

    /// Parses `input` as an object whose keys are read as `i64`.
    ///
    /// # Errors
    ///
    /// Returns an error if `input` is not an object or a key is not an integer.
    fn parse_integer_keyed(&self, input: &[u8]) -> Result<Option<HashMap<i64, V>>, CodecError>;
}

/// A codec that can both encode and decode `V`.
pub trait ValueCodec<V>: ValueEncoder<V> + ValueDecoder<V> {}

impl<V, C> ValueCodec<V> for C where C: ValueEncoder<V> + ValueDecoder<V> {}

/// [`ValueEncoder`] and [`ValueDecoder`] backed by `serde_json`.
///
/// Any `V: Serialize + DeserializeOwned` works; `serde_json::Value` keeps
/// decoded values opaque.
///
/// # Examples
///
/// ```rust
/// use sortable_map::codec::{JsonCodec, ValueEncoder};
///
/// let codec = JsonCodec;
/// assert_eq!(codec.serialize_value(Some(&vec![1, 2])).unwrap(), "[1,2]");
/// assert_eq!(ValueEncoder::<i32>::serialize_value(&codec, None).unwrap(), "null");
/// ```
#[cfg(feature = "serde")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonCodec;

#[cfg(feature = "serde")]
impl<V> ValueEncoder<V> for JsonCodec
where
    V: serde::Serialize,
{
    fn serialize_value(&self, value: Option<&V>) -> Result<String, CodecError> {
        match value {
            Some(value) => Ok(serde_json::to_string(value)?),
            None => Ok(String::from("null")),
        }
    }
}

#[cfg(feature = "serde")]
impl<V> ValueDecoder<V> for JsonCodec
where
    V: serde::de::DeserializeOwned,
{
    fn parse_text_keyed(&self, input: &[u8]) -> Result<Option<HashMap<String, V>>, CodecError> {
        Ok(serde_json::from_slice(input)?)
    }

    fn parse_integer_keyed(&self, input: &[u8]) -> Result<Option<HashMap<i64, V>>, CodecError> {
        Ok(serde_json::from_slice(input)?)
    }
}
