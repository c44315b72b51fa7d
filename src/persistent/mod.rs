//! Persistent (immutable) data structures.
//!
//! This module provides the immutable containers the accessors in
//! [`crate::access`] operate on. All of them use structural sharing, so an
//! update produces a new version while every earlier version stays valid:
//!
//! - [`PersistentHashMap`]: Persistent hash map (HAMT)
//! - [`PersistentOrderedMap`]: Persistent map iterating in insertion order
//! - [`PersistentSequence`]: Persistent append-only sequence
//!
//! Each has a transient counterpart ([`TransientHashMap`],
//! [`TransientOrderedMap`], [`TransientSequence`]) for batched mutation:
//! updates are applied to one single-owner buffer and frozen into a single
//! new persistent value.
//!
//! # Examples
//!
//! ```rust
//! use persistent_access::persistent::{PersistentHashMap, TransientHashMap};
//!
//! let mut transient = TransientHashMap::new();
//! for index in 0..1000 {
//!     transient.insert(index, index * 2);
//! }
//! let map: PersistentHashMap<i32, i32> = transient.persistent();
//!
//! assert_eq!(map.len(), 1000);
//! assert_eq!(map.get(&500), Some(&1000));
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which makes every persistent container `Send + Sync`.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod hashmap;
mod ordered_map;
mod sequence;

pub use hashmap::PersistentHashMap;
pub use hashmap::PersistentHashMapIterator;
pub use hashmap::TransientHashMap;
pub use ordered_map::PersistentOrderedMap;
pub use ordered_map::TransientOrderedMap;
pub use sequence::PersistentSequence;
pub use sequence::PersistentSequenceIterator;
pub use sequence::TransientSequence;

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentHashMap<String, i32>: Send, Sync);
#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentOrderedMap<String, i32>: Send, Sync);

static_assertions::assert_not_impl_any!(TransientOrderedMap<String, i32>: Send, Sync);
static_assertions::assert_not_impl_any!(TransientSequence<i32>: Send, Sync);

// =============================================================================
// Tests
// =============================================================================
