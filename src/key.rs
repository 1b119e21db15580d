//! Key shapes understood by the text encoding.
//!
//! JSON object keys are always text on the wire. When decoding, the text is
//! either kept as is ([`KeyKind::Text`]) or read as a signed 64-bit integer
//! ([`KeyKind::Integer`]). [`MapKey`] can hold either shape, so a map of
//! `MapKey` keys can be filled from both.

use std::collections::HashMap;
use std::fmt;

/// The two supported external key shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyKind {
    /// Keys are taken literally as text.
    Text,
    /// Keys are signed 64-bit integers.
    Integer,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => formatter.write_str("text-keyed"),
            Self::Integer => formatter.write_str("integer-keyed"),
        }
    }
}

/// A key that is either text or a signed 64-bit integer.
///
/// `Display` renders text verbatim and integers in decimal, which is the form
/// used for field names when encoding. Note that `Text("1")` and
/// `Integer(1)` are distinct keys even though both render as `1`.
///
/// # Examples
///
/// ```rust
/// use sortable_map::MapKey;
///
/// assert_eq!(MapKey::from("name").to_string(), "name");
/// assert_eq!(MapKey::from(-7_i64).to_string(), "-7");
/// assert_ne!(MapKey::from("1"), MapKey::from(1_i64));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    /// A text key.
    Text(String),
    /// An integer key.
    Integer(i64),
}

impl MapKey {
    /// Returns the shape of this key.
    pub const fn kind(&self) -> KeyKind {
        match self {
            Self::Text(_) => KeyKind::Text,
            Self::Integer(_) => KeyKind::Integer,
        }
    }

    /// Returns the text if this is a text key.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Integer(_) => None,
        }
    }

    /// Returns the integer if this is an integer key.
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Text(_) => None,
            Self::Integer(integer) => Some(*integer),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => formatter.write_str(text),
            Self::Integer(integer) => write!(formatter, "{integer}"),
        }
    }
}

impl From<String> for MapKey {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for MapKey {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<i64> for MapKey {
    fn from(integer: i64) -> Self {
        Self::Integer(integer)
    }
}

/// Conversion from the two external key shapes into a map's key type.
///
/// A conversion returns `None` when the key has no counterpart in `Self`,
/// such as the text `"abc"` for an `i64` key.
///
/// # Examples
///
/// ```rust
/// use sortable_map::key::DecodeKey;
///
/// assert_eq!(String::from_integer(12), Some("12".to_string()));
/// assert_eq!(i64::from_text("-3".to_string()), Some(-3));
/// assert_eq!(i64::from_text("abc".to_string()), None);
/// ```
pub trait DecodeKey: Sized {
    /// Converts a text key.
    fn from_text(text: String) -> Option<Self>;

    /// Converts an integer key.
    fn from_integer(integer: i64) -> Option<Self>;
}

impl DecodeKey for MapKey {
    fn from_text(text: String) -> Option<Self> {
        Some(Self::Text(text))
    }

    fn from_integer(integer: i64) -> Option<Self> {
        Some(Self::Integer(integer))
    }
}

impl DecodeKey for String {
    fn from_text(text: String) -> Option<Self> {
        Some(text)
    }

    fn from_integer(integer: i64) -> Option<Self> {
        Some(integer.to_string())
    }
}

impl DecodeKey for i64 {
    fn from_text(text: String) -> Option<Self> {
        text.parse().ok()
    }

    fn from_integer(integer: i64) -> Option<Self> {
        Some(integer)
    }
}

/// A finite mapping handed to a bulk loader, tagged with its key shape.
#[derive(Clone, Debug, PartialEq)]
pub enum SourceMapping<V> {
    /// A mapping with text keys.
    Text(HashMap<String, V>),
    /// A mapping with signed 64-bit integer keys.
    Integer(HashMap<i64, V>),
}

impl<V> SourceMapping<V> {
    /// Returns the key shape of this mapping.
    pub const fn kind(&self) -> KeyKind {
        match self {
            Self::Text(_) => KeyKind::Text,
            Self::Integer(_) => KeyKind::Integer,
        }
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(mapping) => mapping.len(),
            Self::Integer(mapping) => mapping.len(),
        }
    }

    /// Returns whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts every key into `K`, consuming the mapping.
    ///
    /// Returns `None` if any key does not convert.
    pub fn into_entries<K>(self) -> Option<Vec<(K, V)>>
    where
        K: DecodeKey,
    {
        match self {
            Self::Text(mapping) => mapping
                .into_iter()
                .map(|(key, value)| K::from_text(key).map(|key| (key, value)))
                .collect(),
            Self::Integer(mapping) => mapping
                .into_iter()
                .map(|(key, value)| K::from_integer(key).map(|key| (key, value)))
                .collect(),
        }
    }
}

impl<V> From<HashMap<String, V>> for SourceMapping<V> {
    fn from(mapping: HashMap<String, V>) -> Self {
        Self::Text(mapping)
    }
}

impl<V> From<HashMap<i64, V>> for SourceMapping<V> {
    fn from(mapping: HashMap<i64, V>) -> Self {
        Self::Integer(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MapKey::from("abc"), "abc")]
    #[case(MapKey::from(42_i64), "42")]
    #[case(MapKey::from(i64::MIN), "-9223372036854775808")]
    fn test_map_key_display(#[case] key: MapKey, #[case] expected: &str) {
        assert_eq!(key.to_string(), expected);
    }

    #[rstest]
    fn test_map_key_accessors() {
        let text = MapKey::from("x".to_string());
        let integer = MapKey::from(5_i64);

        assert_eq!(text.kind(), KeyKind::Text);
        assert_eq!(text.as_text(), Some("x"));
        assert_eq!(text.as_integer(), None);
        assert_eq!(integer.kind(), KeyKind::Integer);
        assert_eq!(integer.as_integer(), Some(5));
        assert_eq!(integer.as_text(), None);
    }

    #[rstest]
    fn test_text_and_integer_keys_are_distinct() {
        assert_ne!(MapKey::from("1"), MapKey::from(1_i64));
    }

    #[rstest]
    fn test_source_mapping_kind_and_entries() {
        let integer_keyed: SourceMapping<&str> =
            HashMap::from([(1_i64, "one"), (2_i64, "two")]).into();
        assert_eq!(integer_keyed.kind(), KeyKind::Integer);
        assert_eq!(integer_keyed.len(), 2);

        let mut entries: Vec<(MapKey, &str)> = integer_keyed.into_entries().unwrap();
        entries.sort();
        assert_eq!(
            entries,
            vec![(MapKey::Integer(1), "one"), (MapKey::Integer(2), "two")]
        );
    }

    #[rstest]
    #[case("17", Some(17))]
    #[case("-4", Some(-4))]
    #[case("abc", None)]
    #[case("9223372036854775808", None)]
    fn test_integer_key_from_text(#[case] text: &str, #[case] expected: Option<i64>) {
        assert_eq!(i64::from_text(text.to_string()), expected);
    }

    #[rstest]
    fn test_text_key_accepts_both_shapes() {
        assert_eq!(String::from_text("a".to_string()), Some("a".to_string()));
        assert_eq!(String::from_integer(-5), Some("-5".to_string()));
    }

    #[rstest]
    fn test_into_entries_fails_when_a_key_does_not_convert() {
        let text_keyed: SourceMapping<i32> =
            HashMap::from([("1".to_string(), 1), ("one".to_string(), 2)]).into();
        assert_eq!(text_keyed.into_entries::<i64>(), None);

        let numeric_text: SourceMapping<i32> = HashMap::from([("1".to_string(), 1)]).into();
        assert_eq!(numeric_text.into_entries::<i64>(), Some(vec![(1, 1)]));
    }

    #[rstest]
    fn test_key_kind_display() {
        assert_eq!(KeyKind::Text.to_string(), "text-keyed");
        assert_eq!(KeyKind::Integer.to_string(), "integer-keyed");
    }
}
