//! Error types for [`OrderedMap`](crate::OrderedMap) operations.
//!
//! Every fallible operation returns an [`OrderedMapError`] to its caller.
//! Nothing is logged-and-dropped and nothing is retried: all operations are
//! local and synchronous, so the same input always yields the same outcome.

/// Boxed error produced by a [`ValueCodec`](crate::codec::ValueCodec).
pub type CodecError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when working with an [`OrderedMap`](crate::OrderedMap).
///
/// # Examples
///
/// ```rust
/// use sortable_map::{OrderedMap, OrderedMapError};
///
/// let map: OrderedMap<String, i32> = OrderedMap::new();
/// assert!(matches!(map.get("missing"), Err(OrderedMapError::KeyNotFound)));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OrderedMapError {
    /// A bulk loader received no mapping.
    #[error("the mapping to load must not be absent")]
    InvalidInput,

    /// A flat key/value sequence had an odd number of items.
    #[error("keys and values must come in pairs, got {length} items")]
    MalformedArguments {
        /// The number of items in the rejected sequence.
        length: usize,
    },

    /// A lookup found no entry for the requested key.
    #[error("no entry exists for the requested key")]
    KeyNotFound,

    /// Decoding input was neither a text-keyed nor an integer-keyed object.
    #[error("input is neither text-keyed nor integer-keyed JSON")]
    UnsupportedKeyShape,

    /// The value codec failed to serialize a value.
    #[error("failed to serialize value: {0}")]
    SerializationFailure(#[source] CodecError),
}

impl OrderedMapError {
    /// Wraps a codec error as [`OrderedMapError::SerializationFailure`].
    pub fn serialization<E>(error: E) -> Self
    where
        E: Into<CodecError>,
    {
        Self::SerializationFailure(error.into())
    }
}

/// Result type for [`OrderedMap`](crate::OrderedMap) operations.
pub type Result<T> = std::result::Result<T, OrderedMapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::error::Error;

    #[rstest]
    #[case(OrderedMapError::InvalidInput, "the mapping to load must not be absent")]
    #[case(
        OrderedMapError::MalformedArguments { length: 3 },
        "keys and values must come in pairs, got 3 items"
    )]
    #[case(OrderedMapError::KeyNotFound, "no entry exists for the requested key")]
    #[case(
        OrderedMapError::UnsupportedKeyShape,
        "input is neither text-keyed nor integer-keyed JSON"
    )]
    fn test_error_display(#[case] error: OrderedMapError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    fn test_serialization_failure_keeps_source() {
        let error = OrderedMapError::serialization("value is not representable");
        assert_eq!(
            error.to_string(),
            "failed to serialize value: value is not representable"
        );
        let source = error.source().expect("source should be kept");
        assert_eq!(source.to_string(), "value is not representable");
    }
}
