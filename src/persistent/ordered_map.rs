//! Persistent (immutable) insertion-ordered map.
//!
//! This module provides [`PersistentOrderedMap`], an immutable map that
//! iterates in first-insertion order, and [`TransientOrderedMap`], its
//! batch builder.
//!
//! # Overview
//!
//! The map pairs a [`PersistentHashMap`] from key to position with a
//! [`PersistentSequence`] of entries. Overwriting an existing key replaces
//! the entry in place, so the key keeps its original position.
//!
//! # Examples
//!
//! ```rust
//! use persistent_access::persistent::PersistentOrderedMap;
//!
//! let map = PersistentOrderedMap::new()
//!     .insert("b", 2)
//!     .insert("a", 1)
//!     .insert("b", 20);
//!
//! let keys: Vec<&&str> = map.keys().collect();
//! assert_eq!(keys, vec![&"b", &"a"]);
//! assert_eq!(map.get("b"), Some(&20));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::iter::FromIterator;

use super::{PersistentHashMap, PersistentSequence, TransientHashMap, TransientSequence};

/// A persistent map that remembers first-insertion order.
///
/// Equality is order-sensitive: two ordered maps with the same entries in
/// a different order are not equal.
#[derive(Clone)]
pub struct PersistentOrderedMap<K, V> {
    positions: PersistentHashMap<K, usize>,
    entries: PersistentSequence<(K, V)>,
}

impl<K, V> PersistentOrderedMap<K, V> {
    /// Creates a new empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            positions: PersistentHashMap::new(),
            entries: PersistentSequence::new(),
        }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Converts this map into a [`TransientOrderedMap`] for batch updates.
    #[must_use]
    pub fn transient(self) -> TransientOrderedMap<K, V> {
        TransientOrderedMap {
            positions: self.positions.transient(),
            entries: self.entries.transient(),
        }
    }
}

impl<K: Clone + Hash + Eq, V: Clone> PersistentOrderedMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = *self.positions.get(key)?;
        self.entries.get(position).map(|(_, value)| value)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.positions.contains_key(key)
    }

    /// Inserts a key-value pair, returning a new map.
    ///
    /// A new key is appended; an existing key keeps its position.
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let mut transient = self.clone().transient();
        transient.insert(key, value);
        transient.persistent()
    }

    /// Returns an iterator over key-value pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&K, &V)> {
        self.entries.iter().map(|(key, value)| (key, value))
    }

    /// Returns an iterator over keys in insertion order.
    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in insertion order.
    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }
}

/// A transient (temporarily mutable) ordered map for efficient batch updates.
pub struct TransientOrderedMap<K, V> {
    positions: TransientHashMap<K, usize>,
    entries: TransientSequence<(K, V)>,
}

impl<K, V> TransientOrderedMap<K, V> {
    /// Creates a new empty transient map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            positions: TransientHashMap::new(),
            entries: TransientSequence::new(),
        }
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the transient contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freezes the transient into a [`PersistentOrderedMap`].
    #[must_use]
    pub fn persistent(self) -> PersistentOrderedMap<K, V> {
        PersistentOrderedMap {
            positions: self.positions.persistent(),
            entries: self.entries.persistent(),
        }
    }
}

impl<K: Clone + Hash + Eq, V: Clone> TransientOrderedMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let position = *self.positions.get(key)?;
        self.entries.get(position).map(|(_, value)| value)
    }

    /// Inserts a key-value pair in place.
    ///
    /// Returns the previous value if the key was already present; the key
    /// then keeps its original position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&position) = self.positions.get(&key) {
            return self
                .entries
                .update(position, (key, value))
                .map(|(_, previous)| previous);
        }
        self.positions.insert(key.clone(), self.entries.len());
        self.entries.push_back((key, value));
        None
    }
}

impl<K, V> Default for PersistentOrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Default for TransientOrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> Extend<(K, V)> for TransientOrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<(K, V)> for PersistentOrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut transient = TransientOrderedMap::new();
        transient.extend(iter);
        transient.persistent()
    }
}

impl<K: Clone + Hash + Eq, V: Clone + PartialEq> PartialEq for PersistentOrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K: Clone + Hash + Eq, V: Clone + Eq> Eq for PersistentOrderedMap<K, V> {}

impl<K: Clone + Hash + Eq + fmt::Debug, V: Clone + fmt::Debug> fmt::Debug
    for PersistentOrderedMap<K, V>
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}
