//! Persistent (immutable) index-addressed sequence.
//!
//! This module provides [`PersistentSequence`], an append-only immutable
//! sequence stored in a [`PersistentHashMap`] keyed by position, and
//! [`TransientSequence`], its batch builder.
//!
//! Indices are dense: a sequence of length `n` holds exactly the positions
//! `0..n`.
//!
//! # Examples
//!
//! ```rust
//! use persistent_access::persistent::PersistentSequence;
//!
//! let sequence: PersistentSequence<&str> = ["a", "b", "c"].into_iter().collect();
//! assert_eq!(sequence.get(1), Some(&"b"));
//!
//! let extended = sequence.push_back("d");
//! assert_eq!(sequence.len(), 3);
//! assert_eq!(extended.len(), 4);
//! ```

use std::fmt;
use std::iter::FromIterator;

use super::{PersistentHashMap, TransientHashMap};

/// A persistent append-only sequence with O(log32 N) positional access.
#[derive(Clone)]
pub struct PersistentSequence<T> {
    items: PersistentHashMap<usize, T>,
}

impl<T> PersistentSequence<T> {
    /// Creates a new empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: PersistentHashMap::new(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the sequence contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts this sequence into a [`TransientSequence`] for batch updates.
    #[must_use]
    pub fn transient(self) -> TransientSequence<T> {
        TransientSequence {
            items: self.items.transient(),
        }
    }
}

impl<T: Clone> PersistentSequence<T> {
    /// Returns the element at `index`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(&index)
    }

    /// Returns a new sequence with `element` appended.
    #[must_use]
    pub fn push_back(&self, element: T) -> Self {
        Self {
            items: self.items.insert(self.len(), element),
        }
    }

    /// Returns a new sequence with the element at `index` replaced, or
    /// `None` if `index` is out of bounds.
    #[must_use]
    pub fn update(&self, index: usize, element: T) -> Option<Self> {
        (index < self.len()).then(|| Self {
            items: self.items.insert(index, element),
        })
    }

    /// Returns an iterator over the elements in positional order.
    #[must_use]
    pub fn iter(&self) -> PersistentSequenceIterator<'_, T> {
        PersistentSequenceIterator {
            sequence: self,
            current_index: 0,
        }
    }
}

/// An iterator over the elements of a [`PersistentSequence`].
pub struct PersistentSequenceIterator<'a, T> {
    sequence: &'a PersistentSequence<T>,
    current_index: usize,
}

impl<'a, T: Clone> Iterator for PersistentSequenceIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.sequence.get(self.current_index)?;
        self.current_index += 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.sequence.len().saturating_sub(self.current_index);
        (remaining, Some(remaining))
    }
}

impl<T: Clone> ExactSizeIterator for PersistentSequenceIterator<'_, T> {}

impl<'a, T: Clone> IntoIterator for &'a PersistentSequence<T> {
    type Item = &'a T;
    type IntoIter = PersistentSequenceIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// A transient (temporarily mutable) sequence for efficient batch appends.
pub struct TransientSequence<T> {
    items: TransientHashMap<usize, T>,
}

impl<T> TransientSequence<T> {
    /// Creates a new empty transient sequence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: TransientHashMap::new(),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the transient contains no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Freezes the transient into a [`PersistentSequence`].
    #[must_use]
    pub fn persistent(self) -> PersistentSequence<T> {
        PersistentSequence {
            items: self.items.persistent(),
        }
    }
}

impl<T: Clone> TransientSequence<T> {
    /// Returns the element at `index`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(&index)
    }

    /// Appends `element` in place.
    pub fn push_back(&mut self, element: T) {
        let index = self.len();
        self.items.insert(index, element);
    }

    /// Replaces the element at `index` in place, returning the previous one.
    ///
    /// Out-of-bounds indices leave the transient unchanged and return `None`.
    pub fn update(&mut self, index: usize, element: T) -> Option<T> {
        if index < self.len() {
            self.items.insert(index, element)
        } else {
            None
        }
    }
}

impl<T> Default for PersistentSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Default for TransientSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Extend<T> for TransientSequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for element in iter {
            self.push_back(element);
        }
    }
}

impl<T: Clone> FromIterator<T> for PersistentSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut transient = TransientSequence::new();
        transient.extend(iter);
        transient.persistent()
    }
}

impl<T: Clone + PartialEq> PartialEq for PersistentSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Clone + Eq> Eq for PersistentSequence<T> {}

impl<T: Clone + fmt::Debug> fmt::Debug for PersistentSequence<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_push_back_preserves_original() {
        let first = PersistentSequence::new().push_back(1);
        let second = first.push_back(2);

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 2);
        assert_eq!(second.get(1), Some(&2));
        assert_eq!(first.get(1), None);
    }

    #[rstest]
    #[case(0, true)]
    #[case(2, true)]
    #[case(3, false)]
    fn test_update_respects_bounds(#[case] index: usize, #[case] in_bounds: bool) {
        let sequence: PersistentSequence<i32> = (0..3).collect();
        assert_eq!(sequence.update(index, 99).is_some(), in_bounds);
    }

    #[rstest]
    fn test_transient_update_out_of_bounds_is_ignored() {
        let mut transient = TransientSequence::new();
        transient.push_back("a");
        assert_eq!(transient.update(5, "z"), None);
        assert_eq!(transient.update(0, "b"), Some("a"));
        assert_eq!(transient.len(), 1);
        assert_eq!(transient.persistent().get(0), Some(&"b"));
    }

    #[rstest]
    fn test_iter_is_positional() {
        let sequence: PersistentSequence<i32> = (0..100).rev().collect();
        let collected: Vec<i32> = sequence.iter().copied().collect();
        assert_eq!(collected, (0..100).rev().collect::<Vec<_>>());
    }
}
