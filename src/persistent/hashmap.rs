//! Persistent (immutable) hash map based on HAMT.
//!
//! This module provides [`PersistentHashMap`], an immutable hash map
//! that uses structural sharing for efficient operations, and
//! [`TransientHashMap`], its single-owner batch builder.
//!
//! # Overview
//!
//! `PersistentHashMap` is a Hash Array Mapped Trie (HAMT). It uses a
//! 32-way branching trie where successive 5-bit slices of the key hash
//! select the child at each level.
//!
//! - O(log32 N) get (effectively O(1) for practical sizes)
//! - O(log32 N) insert
//! - O(1) len and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use persistent_access::persistent::PersistentHashMap;
//!
//! let map = PersistentHashMap::new()
//!     .insert("one".to_string(), 1)
//!     .insert("two".to_string(), 2);
//!
//! // Structural sharing: the original map is preserved
//! let updated = map.insert("one".to_string(), 100);
//! assert_eq!(map.get("one"), Some(&1));
//! assert_eq!(updated.get("one"), Some(&100));
//! ```
//!
//! # Transient-Persistent Pattern
//!
//! A [`TransientHashMap`] owns its root. Nodes it owns exclusively are
//! updated in place; nodes still shared with a persistent map are copied
//! on first write. Building N entries through a transient therefore
//! allocates one path per new node instead of one path per insert.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::mem;
use std::rc::Rc;

use super::ReferenceCounter;

// =============================================================================
// Constants
// =============================================================================

/// Branching factor (2^5 = 32)
const BRANCHING_FACTOR: usize = 32;

/// Bits per level in the trie
const BITS_PER_LEVEL: usize = 5;

/// Bit mask for extracting index within a node
const MASK: u64 = (BRANCHING_FACTOR - 1) as u64;

// =============================================================================
// Hash computation
// =============================================================================

#[cfg(feature = "fxhash")]
type KeyHasher = rustc_hash::FxHasher;

#[cfg(not(feature = "fxhash"))]
type KeyHasher = std::collections::hash_map::DefaultHasher;

fn compute_hash<K: Hash + ?Sized>(key: &K) -> u64 {
    let mut hasher = KeyHasher::default();
    key.hash(&mut hasher);
    hasher.finish()
}

/// Extracts the child index at a given depth from a hash.
///
/// Two distinct hashes always differ within the first 13 levels, so the
/// shift never reaches 64.
#[inline]
const fn hash_index(hash: u64, depth: usize) -> usize {
    ((hash >> (depth * BITS_PER_LEVEL)) & MASK) as usize
}

// =============================================================================
// Node Definition
// =============================================================================

#[derive(Clone)]
enum Node<K, V> {
    /// Bitmap-indexed branch; `children` is compressed to the set bits.
    Bitmap { bitmap: u32, children: Vec<Child<K, V>> },
    /// Keys whose full 64-bit hashes are equal.
    Collision { hash: u64, entries: Vec<(K, V)> },
}

#[derive(Clone)]
enum Child<K, V> {
    Entry { hash: u64, key: K, value: V },
    Node(ReferenceCounter<Node<K, V>>),
}

impl<K, V> Node<K, V> {
    const fn empty() -> Self {
        Self::Bitmap {
            bitmap: 0,
            children: Vec::new(),
        }
    }

    fn get<Q>(&self, key: &Q, hash: u64, depth: usize) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        match self {
            Self::Bitmap { bitmap, children } => {
                let bit = 1u32 << hash_index(hash, depth);
                if bitmap & bit == 0 {
                    return None;
                }
                let position = (bitmap & (bit - 1)).count_ones() as usize;
                match &children[position] {
                    Child::Entry {
                        hash: entry_hash,
                        key: entry_key,
                        value,
                    } => (*entry_hash == hash && entry_key.borrow() == key).then_some(value),
                    Child::Node(subnode) => subnode.get(key, hash, depth + 1),
                }
            }
            Self::Collision { entries, .. } => entries
                .iter()
                .find(|(entry_key, _)| entry_key.borrow() == key)
                .map(|(_, value)| value),
        }
    }

    fn collect_entries<'a>(&'a self, entries: &mut Vec<(&'a K, &'a V)>) {
        match self {
            Self::Bitmap { children, .. } => {
                for child in children {
                    match child {
                        Child::Entry { key, value, .. } => entries.push((key, value)),
                        Child::Node(subnode) => subnode.collect_entries(entries),
                    }
                }
            }
            Self::Collision {
                entries: collision_entries,
                ..
            } => entries.extend(collision_entries.iter().map(|(key, value)| (key, value))),
        }
    }
}

impl<K: Clone + Eq, V: Clone> Node<K, V> {
    /// Inserts in place, copying shared subnodes on the way down.
    /// Returns the replaced value if the key was already present.
    fn insert(&mut self, key: K, value: V, hash: u64, depth: usize) -> Option<V> {
        let foreign_collision = match self {
            Self::Collision {
                hash: collision_hash,
                ..
            } if *collision_hash != hash => Some(*collision_hash),
            _ => None,
        };
        if let Some(collision_hash) = foreign_collision {
            let collision = mem::replace(self, Self::empty());
            *self = Self::Bitmap {
                bitmap: 1u32 << hash_index(collision_hash, depth),
                children: vec![Child::Node(ReferenceCounter::new(collision))],
            };
        }

        match self {
            Self::Bitmap { bitmap, children } => {
                let bit = 1u32 << hash_index(hash, depth);
                let position = (*bitmap & (bit - 1)).count_ones() as usize;

                if *bitmap & bit == 0 {
                    children.insert(position, Child::Entry { hash, key, value });
                    *bitmap |= bit;
                    return None;
                }

                let child = &mut children[position];
                match child {
                    Child::Node(subnode) => {
                        ReferenceCounter::make_mut(subnode).insert(key, value, hash, depth + 1)
                    }
                    Child::Entry {
                        hash: existing_hash,
                        key: existing_key,
                        value: existing_value,
                    } => {
                        if *existing_hash == hash && *existing_key == key {
                            return Some(mem::replace(existing_value, value));
                        }
                        let subnode = Self::from_two_entries(
                            (*existing_hash, existing_key.clone(), existing_value.clone()),
                            (hash, key, value),
                            depth + 1,
                        );
                        *child = Child::Node(ReferenceCounter::new(subnode));
                        None
                    }
                }
            }
            Self::Collision { entries, .. } => {
                if let Some((_, existing_value)) =
                    entries.iter_mut().find(|(entry_key, _)| *entry_key == key)
                {
                    return Some(mem::replace(existing_value, value));
                }
                entries.push((key, value));
                None
            }
        }
    }

    fn from_two_entries(first: (u64, K, V), second: (u64, K, V), depth: usize) -> Self {
        let (first_hash, first_key, first_value) = first;
        let (second_hash, second_key, second_value) = second;

        if first_hash == second_hash {
            return Self::Collision {
                hash: first_hash,
                entries: vec![(first_key, first_value), (second_key, second_value)],
            };
        }

        let first_index = hash_index(first_hash, depth);
        let second_index = hash_index(second_hash, depth);

        if first_index == second_index {
            let subnode = Self::from_two_entries(
                (first_hash, first_key, first_value),
                (second_hash, second_key, second_value),
                depth + 1,
            );
            return Self::Bitmap {
                bitmap: 1u32 << first_index,
                children: vec![Child::Node(ReferenceCounter::new(subnode))],
            };
        }

        let first_child = Child::Entry {
            hash: first_hash,
            key: first_key,
            value: first_value,
        };
        let second_child = Child::Entry {
            hash: second_hash,
            key: second_key,
            value: second_value,
        };
        let children = if first_index < second_index {
            vec![first_child, second_child]
        } else {
            vec![second_child, first_child]
        };

        Self::Bitmap {
            bitmap: (1u32 << first_index) | (1u32 << second_index),
            children,
        }
    }
}

// =============================================================================
// PersistentHashMap Definition
// =============================================================================

/// A persistent (immutable) hash map based on HAMT.
///
/// # Time Complexity
///
/// | Operation      | Complexity        |
/// |----------------|-------------------|
/// | `new`          | O(1)              |
/// | `get`          | O(log32 N)        |
/// | `insert`       | O(log32 N)        |
/// | `contains_key` | O(log32 N)        |
/// | `len`          | O(1)              |
///
/// # Examples
///
/// ```rust
/// use persistent_access::persistent::PersistentHashMap;
///
/// let map = PersistentHashMap::singleton("key".to_string(), 42);
/// assert_eq!(map.get("key"), Some(&42));
/// ```
#[derive(Clone)]
pub struct PersistentHashMap<K, V> {
    root: ReferenceCounter<Node<K, V>>,
    length: usize,
}

impl<K, V> PersistentHashMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_access::persistent::PersistentHashMap;
    ///
    /// let map: PersistentHashMap<String, i32> = PersistentHashMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: ReferenceCounter::new(Node::empty()),
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns an iterator over key-value pairs.
    ///
    /// Iteration order is unspecified but stable for a given map.
    #[must_use]
    pub fn iter(&self) -> PersistentHashMapIterator<'_, K, V> {
        let mut entries = Vec::with_capacity(self.length);
        self.root.collect_entries(&mut entries);
        PersistentHashMapIterator {
            entries,
            current_index: 0,
        }
    }

    /// Returns an iterator over keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    /// Converts this map into a [`TransientHashMap`] for batch updates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_access::persistent::PersistentHashMap;
    ///
    /// let base = PersistentHashMap::singleton(0, "zero");
    /// let mut transient = base.clone().transient();
    /// transient.insert(1, "one");
    /// transient.insert(2, "two");
    /// let extended = transient.persistent();
    ///
    /// assert_eq!(base.len(), 1);
    /// assert_eq!(extended.len(), 3);
    /// ```
    #[must_use]
    pub fn transient(self) -> TransientHashMap<K, V> {
        TransientHashMap {
            root: self.root,
            length: self.length,
            _marker: PhantomData,
        }
    }
}

impl<K: Clone + Hash + Eq, V: Clone> PersistentHashMap<K, V> {
    /// Creates a map containing a single key-value pair.
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but `Hash` and
    /// `Eq` on the borrowed form must match those for the key type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_access::persistent::PersistentHashMap;
    ///
    /// let map = PersistentHashMap::new().insert("hello".to_string(), 42);
    ///
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.root.get(key, compute_hash(key), 0)
    }

    /// Returns `true` if the map contains a value for the specified key.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Inserts a key-value pair, returning a new map.
    ///
    /// If the map already contains the key, the value is replaced. Only the
    /// nodes on the path to the key are copied; everything else is shared
    /// with `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_access::persistent::PersistentHashMap;
    ///
    /// let map1 = PersistentHashMap::new().insert("key".to_string(), 1);
    /// let map2 = map1.insert("key".to_string(), 2);
    ///
    /// assert_eq!(map1.get("key"), Some(&1));
    /// assert_eq!(map2.get("key"), Some(&2));
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let mut transient = self.clone().transient();
        transient.insert(key, value);
        transient.persistent()
    }
}

// =============================================================================
// TransientHashMap Definition
// =============================================================================

/// A transient (temporarily mutable) hash map for efficient batch updates.
///
/// Obtained from [`PersistentHashMap::transient`] or [`TransientHashMap::new`]
/// and frozen with [`TransientHashMap::persistent`]. A transient is neither
/// `Send` nor `Sync`, whatever the reference counter in use.
///
/// # Examples
///
/// ```rust
/// use persistent_access::persistent::TransientHashMap;
///
/// let mut transient = TransientHashMap::new();
/// transient.insert("a", 1);
/// assert_eq!(transient.insert("a", 2), Some(1));
///
/// let map = transient.persistent();
/// assert_eq!(map.get("a"), Some(&2));
/// ```
pub struct TransientHashMap<K, V> {
    root: ReferenceCounter<Node<K, V>>,
    length: usize,
    _marker: PhantomData<Rc<()>>,
}

static_assertions::assert_not_impl_any!(TransientHashMap<i32, i32>: Send, Sync);
static_assertions::assert_not_impl_any!(TransientHashMap<String, String>: Send, Sync);

impl<K, V> TransientHashMap<K, V> {
    /// Creates a new empty transient map.
    #[must_use]
    pub fn new() -> Self {
        PersistentHashMap::new().transient()
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the transient contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Freezes the transient into a [`PersistentHashMap`].
    #[must_use]
    pub fn persistent(self) -> PersistentHashMap<K, V> {
        PersistentHashMap {
            root: self.root,
            length: self.length,
        }
    }
}

impl<K: Clone + Hash + Eq, V: Clone> TransientHashMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.root.get(key, compute_hash(key), 0)
    }

    /// Inserts a key-value pair in place.
    ///
    /// Returns the previous value if the key was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = compute_hash(&key);
        let previous = ReferenceCounter::make_mut(&mut self.root).insert(key, value, hash, 0);
        if previous.is_none() {
            self.length += 1;
        }
        previous
    }
}

impl<K, V> Default for TransientHashMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> Extend<(K, V)> for TransientHashMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

// =============================================================================
// Iterator Implementation
// =============================================================================

/// An iterator over key-value pairs of a [`PersistentHashMap`].
pub struct PersistentHashMapIterator<'a, K, V> {
    entries: Vec<(&'a K, &'a V)>,
    current_index: usize,
}

impl<'a, K, V> Iterator for PersistentHashMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.get(self.current_index).copied()?;
        self.current_index += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.entries.len().saturating_sub(self.current_index);
        (remaining, Some(remaining))
    }
}

impl<K, V> ExactSizeIterator for PersistentHashMapIterator<'_, K, V> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for PersistentHashMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Hash + Eq, V: Clone> FromIterator<(K, V)> for PersistentHashMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut transient = TransientHashMap::new();
        transient.extend(iter);
        transient.persistent()
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentHashMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentHashMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Clone + Hash + Eq, V: Clone + PartialEq> PartialEq for PersistentHashMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.length != other.length {
            return false;
        }
        if ReferenceCounter::ptr_eq(&self.root, &other.root) {
            return true;
        }

        self.iter()
            .all(|(key, value)| other.get(key).is_some_and(|other_value| other_value == value))
    }
}

impl<K: Clone + Hash + Eq, V: Clone + Eq> Eq for PersistentHashMap<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentHashMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    /// Key whose hash is fixed, forcing every instance into one collision node.
    #[derive(Clone, Debug, PartialEq, Eq)]
    struct CollidingKey(u32);

    impl Hash for CollidingKey {
        fn hash<H: Hasher>(&self, state: &mut H) {
            0u8.hash(state);
        }
    }

    #[rstest]
    fn test_hash_index_uses_five_bit_slices() {
        let hash = 0b11111_00001_u64;
        assert_eq!(hash_index(hash, 0), 1);
        assert_eq!(hash_index(hash, 1), 31);
        assert_eq!(hash_index(hash, 2), 0);
    }

    #[rstest]
    fn test_colliding_keys_are_kept_apart() {
        let map: PersistentHashMap<CollidingKey, u32> =
            (0..5).map(|index| (CollidingKey(index), index * 10)).collect();

        assert_eq!(map.len(), 5);
        for index in 0..5 {
            assert_eq!(map.get(&CollidingKey(index)), Some(&(index * 10)));
        }
        assert_eq!(map.get(&CollidingKey(99)), None);
    }

    #[rstest]
    fn test_colliding_key_overwrite_keeps_length() {
        let map = PersistentHashMap::new()
            .insert(CollidingKey(1), "a")
            .insert(CollidingKey(2), "b")
            .insert(CollidingKey(1), "c");

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&CollidingKey(1)), Some(&"c"));
    }

    #[rstest]
    fn test_transient_copies_shared_root_on_first_write() {
        let base: PersistentHashMap<i32, i32> = (0..100).map(|index| (index, index)).collect();
        let mut transient = base.clone().transient();
        transient.insert(0, -1);
        transient.insert(1000, 1000);

        assert_eq!(base.get(&0), Some(&0));
        assert_eq!(base.get(&1000), None);
        assert_eq!(base.len(), 100);

        let updated = transient.persistent();
        assert_eq!(updated.get(&0), Some(&-1));
        assert_eq!(updated.len(), 101);
    }

    #[rstest]
    fn test_unique_transient_reuses_root_allocation() {
        let mut transient = TransientHashMap::new();
        transient.insert(1, 1);
        let before = ReferenceCounter::as_ptr(&transient.root);
        transient.insert(2, 2);
        assert_eq!(before, ReferenceCounter::as_ptr(&transient.root));
    }

    #[rstest]
    fn test_equality_ignores_insertion_order() {
        let forward: PersistentHashMap<i32, i32> = (0..50).map(|index| (index, index)).collect();
        let backward: PersistentHashMap<i32, i32> =
            (0..50).rev().map(|index| (index, index)).collect();
        assert_eq!(forward, backward);
    }
}
