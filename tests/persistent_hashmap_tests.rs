//! Unit tests for PersistentHashMap and TransientHashMap.

use persistent_access::persistent::{PersistentHashMap, TransientHashMap};
use rstest::rstest;
use std::hash::{Hash, Hasher};

// =============================================================================
// Empty map creation (new, is_empty, len)
// =============================================================================

#[rstest]
fn test_new_creates_empty_map() {
    let map: PersistentHashMap<String, i32> = PersistentHashMap::new();
    assert!(map.is_empty());
    assert_eq!(map.len(), 0);
    assert_eq!(map.get("key"), None);
}

// =============================================================================
// Basic insert and get operations
// =============================================================================

#[rstest]
fn test_singleton_creates_single_entry_map() {
    let map = PersistentHashMap::singleton("key".to_string(), 42);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("key"), Some(&42));
}

#[rstest]
fn test_insert_multiple_entries() {
    let map = PersistentHashMap::new()
        .insert("one".to_string(), 1)
        .insert("two".to_string(), 2)
        .insert("three".to_string(), 3);

    assert_eq!(map.len(), 3);
    assert_eq!(map.get("one"), Some(&1));
    assert_eq!(map.get("two"), Some(&2));
    assert_eq!(map.get("three"), Some(&3));
    assert_eq!(map.get("four"), None);
}

#[rstest]
fn test_insert_does_not_modify_original() {
    let map1 = PersistentHashMap::new().insert("key".to_string(), 1);
    let map2 = map1.insert("key2".to_string(), 2);

    assert_eq!(map1.len(), 1);
    assert_eq!(map1.get("key2"), None);
    assert_eq!(map2.len(), 2);
    assert_eq!(map2.get("key2"), Some(&2));
}

#[rstest]
fn test_insert_overwrites_existing_key() {
    let map1 = PersistentHashMap::new().insert("key".to_string(), 1);
    let map2 = map1.insert("key".to_string(), 2);

    assert_eq!(map1.get("key"), Some(&1));
    assert_eq!(map2.get("key"), Some(&2));
    assert_eq!(map2.len(), 1);
}

#[rstest]
fn test_contains_key() {
    let map = PersistentHashMap::new().insert("key".to_string(), 42);

    assert!(map.contains_key("key"));
    assert!(!map.contains_key("other"));
}

// =============================================================================
// Hash collision handling
// =============================================================================

/// A type that always produces the same hash value for collision testing.
#[derive(Clone, PartialEq, Eq, Debug)]
struct CollidingKey {
    value: u32,
}

impl Hash for CollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        42u64.hash(state);
    }
}

/// A type that collides with every other instance except on one value.
#[derive(Clone, PartialEq, Eq, Debug)]
struct MostlyCollidingKey {
    value: u32,
}

impl Hash for MostlyCollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.value == 0).hash(state);
    }
}

#[rstest]
fn test_collision_entries_are_all_retrievable() {
    let map: PersistentHashMap<CollidingKey, u32> = (0..10)
        .map(|value| (CollidingKey { value }, value))
        .collect();

    assert_eq!(map.len(), 10);
    for value in 0..10 {
        assert_eq!(map.get(&CollidingKey { value }), Some(&value));
    }
}

#[rstest]
fn test_insert_beside_collision_node() {
    let map: PersistentHashMap<MostlyCollidingKey, u32> = (0..6)
        .rev()
        .map(|value| (MostlyCollidingKey { value }, value * 2))
        .collect();

    assert_eq!(map.len(), 6);
    for value in 0..6 {
        assert_eq!(map.get(&MostlyCollidingKey { value }), Some(&(value * 2)));
    }
}

// =============================================================================
// Iteration
// =============================================================================

#[rstest]
fn test_iter_visits_every_entry_once() {
    let map: PersistentHashMap<i32, i32> = (0..1000).map(|index| (index, index * 3)).collect();

    let mut keys: Vec<i32> = map.keys().copied().collect();
    keys.sort_unstable();
    assert_eq!(keys, (0..1000).collect::<Vec<_>>());
    assert_eq!(map.iter().len(), 1000);
    assert_eq!(map.values().map(|value| i64::from(*value)).sum::<i64>(), 3 * 999 * 1000 / 2);
}

// =============================================================================
// Transient
// =============================================================================

#[rstest]
fn test_transient_batch_insert_matches_persistent_inserts() {
    let mut transient = TransientHashMap::new();
    let mut persistent = PersistentHashMap::new();
    for index in 0..500 {
        transient.insert(index % 123, index);
        persistent = persistent.insert(index % 123, index);
    }

    assert_eq!(transient.len(), 123);
    assert_eq!(transient.persistent(), persistent);
}

#[rstest]
fn test_transient_from_shared_map_leaves_source_untouched() {
    let source: PersistentHashMap<i32, &str> = [(1, "a"), (2, "b")].into_iter().collect();
    let mut transient = source.clone().transient();
    assert_eq!(transient.insert(1, "changed"), Some("a"));
    transient.insert(3, "c");
    let derived = transient.persistent();

    assert_eq!(source.get(&1), Some(&"a"));
    assert_eq!(source.len(), 2);
    assert_eq!(derived.get(&1), Some(&"changed"));
    assert_eq!(derived.len(), 3);
}

#[rstest]
fn test_transient_get_sees_pending_writes() {
    let mut transient = TransientHashMap::new();
    transient.insert("k".to_string(), 1);
    assert_eq!(transient.get("k"), Some(&1));
    assert!(!transient.is_empty());
}

#[rstest]
fn test_debug_formats_as_map() {
    let map = PersistentHashMap::singleton("key", 1);
    assert_eq!(format!("{map:?}"), r#"{"key": 1}"#);
}
