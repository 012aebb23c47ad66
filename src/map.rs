//! Ordered map type for Bencode dictionaries.
//!
//! This module provides [`BenMap`], a wrapper around [`IndexMap`] keyed by raw
//! byte strings. Bencode recommends sorted, unique keys but the decoder
//! accepts any order, so the map keeps keys in the order they were first
//! seen on the wire.
//!
//! Inserting a key that is already present replaces its value in place: the
//! key keeps its original position and the last value wins.
//!
//! ## Examples
//!
//! ```rust
//! use benspan::{BenMap, Value};
//!
//! let mut map = BenMap::new();
//! map.insert(b"spam".to_vec(), Value::str("eggs"));
//! map.insert(b"cow".to_vec(), Value::str("moo"));
//!
//! let keys: Vec<&[u8]> = map.keys().map(|k| k.as_slice()).collect();
//! assert_eq!(keys, vec![&b"spam"[..], &b"cow"[..]]);
//! assert_eq!(map.get(b"cow").and_then(|v| v.as_str()), Some("moo"));
//! ```

use crate::Value;
use indexmap::IndexMap;

/// An insertion-ordered map of byte-string keys to decoded values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenMap(IndexMap<Vec<u8>, Value>);

impl BenMap {
    /// Creates an empty `BenMap`.
    #[must_use]
    pub fn new() -> Self {
        BenMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        BenMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned and
    /// the key keeps its position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use benspan::{BenMap, Value};
    ///
    /// let mut map = BenMap::new();
    /// assert!(map.insert(b"key".to_vec(), Value::int(1)).is_none());
    /// assert!(map.insert(b"key".to_vec(), Value::int(2)).is_some());
    /// assert_eq!(map.get(b"key").and_then(|v| v.as_i64()), Some(2));
    /// ```
    pub fn insert(&mut self, key: Vec<u8>, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &[u8]) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, Vec<u8>, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, Vec<u8>, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, Vec<u8>, Value> {
        self.0.iter()
    }
}

impl IntoIterator for BenMap {
    type Item = (Vec<u8>, Value);
    type IntoIter = indexmap::map::IntoIter<Vec<u8>, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a BenMap {
    type Item = (&'a Vec<u8>, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Vec<u8>, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(Vec<u8>, Value)> for BenMap {
    fn from_iter<T: IntoIterator<Item = (Vec<u8>, Value)>>(iter: T) -> Self {
        BenMap(IndexMap::from_iter(iter))
    }
}
