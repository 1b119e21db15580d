//! Key comparators.
//!
//! A [`Comparator`] is a shared less-than predicate over two keys. It is
//! consulted only when an ordered view of the keys is materialized and is
//! never stored per entry.
//!
//! # Examples
//!
//! ```rust
//! use sortable_map::comparator::Comparator;
//!
//! let by_text: Comparator<i32> = Comparator::by_text();
//! assert!(by_text.less(&10, &2)); // "10" < "2"
//!
//! let natural: Comparator<i32> = Comparator::natural();
//! assert!(natural.less(&2, &10));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Shared less-than predicate: `less(a, b)` reports whether `a` sorts before `b`.
///
/// The predicate must describe a consistent strict weak order over every key
/// it sees. An inconsistent predicate produces an unspecified order, but never
/// a panic or a non-terminating sort.
pub struct Comparator<K> {
    less: Arc<dyn Fn(&K, &K) -> bool + Send + Sync>,
}

impl<K: 'static> Comparator<K> {
    /// Creates a comparator from a less-than function.
    pub fn new<F>(less: F) -> Self
    where
        F: Fn(&K, &K) -> bool + Send + Sync + 'static,
    {
        Self {
            less: Arc::new(less),
        }
    }

    /// Formats both keys as text and compares the results lexicographically.
    ///
    /// With this comparator `"10"` sorts before `"2"`.
    #[must_use]
    pub fn by_text() -> Self
    where
        K: fmt::Display,
    {
        Self::new(default_key_less)
    }

    /// Uses the key type's own [`Ord`] implementation.
    #[must_use]
    pub fn natural() -> Self
    where
        K: Ord,
    {
        Self::new(|left: &K, right: &K| left < right)
    }

    /// Orders keys by the value extracted with `project`.
    ///
    /// ```rust
    /// use sortable_map::comparator::Comparator;
    ///
    /// let numeric = Comparator::by_key(|key: &String| key.parse::<i64>().unwrap_or(0));
    /// assert!(numeric.less(&"2".to_string(), &"10".to_string()));
    /// ```
    pub fn by_key<T, F>(project: F) -> Self
    where
        T: Ord,
        F: Fn(&K) -> T + Send + Sync + 'static,
    {
        Self::new(move |left: &K, right: &K| project(left) < project(right))
    }

    /// Returns a comparator producing the opposite order.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let less = Arc::clone(&self.less);
        Self::new(move |left: &K, right: &K| less(right, left))
    }
}

impl<K> Comparator<K> {
    /// Returns whether `left` sorts before `right`.
    #[inline]
    pub fn less(&self, left: &K, right: &K) -> bool {
        (self.less)(left, right)
    }

    /// Derives a three-way [`Ordering`] from the predicate.
    ///
    /// Keys where neither sorts before the other are reported as equal.
    pub fn ordering(&self, left: &K, right: &K) -> Ordering {
        if self.less(left, right) {
            Ordering::Less
        } else if self.less(right, left) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl<K> Clone for Comparator<K> {
    fn clone(&self) -> Self {
        Self {
            less: Arc::clone(&self.less),
        }
    }
}

impl<K: fmt::Display + 'static> Default for Comparator<K> {
    fn default() -> Self {
        Self::by_text()
    }
}

impl<K> fmt::Debug for Comparator<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Comparator(..)")
    }
}

/// The default ordering: compare the `Display` text of both keys.
pub fn default_key_less<K: fmt::Display>(left: &K, right: &K) -> bool {
    left.to_string() < right.to_string()
}
