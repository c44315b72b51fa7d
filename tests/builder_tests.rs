//! Tests for convert_to_map and map_items.

use persistent_access::access::{
    BuildError, DEFAULT_KEY_FIELD, MapItemsOptions, convert_to_map, map_items,
};
use persistent_access::value::{Container, Key, Value, from_plain};
use rstest::rstest;
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

// =============================================================================
// convert_to_map
// =============================================================================

#[rstest]
fn test_convert_to_map_last_write_wins() {
    init_tracing();
    let items = [
        json!({"id": 1, "x": "a"}),
        json!({"id": 2, "x": "b"}),
        json!({"id": 1, "x": "c"}),
    ];
    let map = convert_to_map(&items, DEFAULT_KEY_FIELD).unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&Key::from(1)), Some(&from_plain(json!({"id": 1, "x": "c"}))));
    assert_eq!(map.get(&Key::from(2)), Some(&from_plain(json!({"id": 2, "x": "b"}))));
}

#[rstest]
fn test_convert_to_map_stores_containers() {
    let items = [json!({"id": "a", "nested": {"deep": [1, 2]}})];
    let map = convert_to_map(&items, DEFAULT_KEY_FIELD).unwrap();
    let record = map.get(&Key::from("a")).unwrap();

    assert!(record.as_container().is_some());
    assert!(
        record
            .get_in(&[Key::from("nested"), Key::from("deep")])
            .and_then(Value::as_container)
            .is_some()
    );
}

#[rstest]
fn test_convert_to_map_with_custom_key() {
    let items = [json!({"sku": "A-1", "id": 9}), json!({"sku": "B-2", "id": 9})];
    let map = convert_to_map(&items, "sku").unwrap();

    assert_eq!(map.len(), 2);
    assert!(map.contains_key(&Key::from("A-1")));
    assert!(map.contains_key(&Key::from("B-2")));
}

#[rstest]
fn test_convert_to_map_of_nothing_is_empty() {
    assert!(convert_to_map(&[], DEFAULT_KEY_FIELD).unwrap().is_empty());
}

#[rstest]
fn test_integral_float_and_integer_ids_collide() {
    let items = [json!({"id": 1, "v": "int"}), json!({"id": 1.0, "v": "float"})];
    let map = convert_to_map(&items, DEFAULT_KEY_FIELD).unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(
        map.get(&Key::from(1)),
        Some(&from_plain(json!({"id": 1.0, "v": "float"})))
    );
}

// =============================================================================
// map_items
// =============================================================================

#[rstest]
fn test_map_items_ordered_projection() {
    let items = [json!({"id": 1, "name": "A"}), json!({"id": 2, "name": "B"})];
    let options = MapItemsOptions::new().keep_order(true).project("name");
    let mapping = map_items(Some(&items[..]), &options).unwrap();

    let Container::OrderedMap(map) = &mapping else {
        panic!("expected an ordered map, got {mapping:?}");
    };
    let entries: Vec<(&Key, &Value)> = map.iter().collect();
    assert_eq!(
        entries,
        vec![
            (&Key::from(1), &Value::from(json!("A"))),
            (&Key::from(2), &Value::from(json!("B"))),
        ]
    );
}

#[rstest]
fn test_projection_stores_raw_values_not_containers() {
    let items = [json!({"id": 1, "tags": ["x", "y"]})];
    let options = MapItemsOptions::new().project("tags");
    let mapping = map_items(Some(&items[..]), &options).unwrap();

    assert_eq!(mapping.get(&Key::from(1)), Some(&Value::from(json!(["x", "y"]))));
}

#[rstest]
fn test_map_items_default_is_unordered_whole_record() {
    let items = [json!({"id": 3, "name": "C"})];
    let mapping = map_items(Some(&items[..]), &MapItemsOptions::default()).unwrap();

    assert!(matches!(mapping, Container::Map(_)));
    assert_eq!(mapping.get(&Key::from(3)), Some(&from_plain(items[0].clone())));
}

#[rstest]
#[case(false)]
#[case(true)]
fn test_map_items_without_items_is_empty_of_requested_variant(#[case] keep_order: bool) {
    let options = MapItemsOptions::new().keep_order(keep_order);

    for items in [None, Some(&[][..])] {
        let mapping = map_items(items, &options).unwrap();
        assert!(mapping.is_empty());
        assert_eq!(matches!(mapping, Container::OrderedMap(_)), keep_order);
    }
}

#[rstest]
fn test_ordered_duplicate_keeps_first_position_and_last_value() {
    let items = [
        json!({"id": "b", "n": 1}),
        json!({"id": "a", "n": 2}),
        json!({"id": "b", "n": 3}),
    ];
    let options = MapItemsOptions::new().keep_order(true).project("n");
    let mapping = map_items(Some(&items[..]), &options).unwrap();

    let keys: Vec<Key> = mapping.iter().map(|(key, _)| key).collect();
    assert_eq!(keys, vec![Key::from("b"), Key::from("a")]);
    assert_eq!(mapping.get(&Key::from("b")), Some(&Value::from(json!(3))));
}

#[rstest]
fn test_unhashable_key_is_reported() {
    init_tracing();
    let items = [json!({"id": {"nested": true}})];
    let error = map_items(Some(&items[..]), &MapItemsOptions::new()).unwrap_err();

    let BuildError::UnhashableKey(details) = error;
    assert_eq!(details.index, 0);
    assert_eq!(details.field, DEFAULT_KEY_FIELD);
}
