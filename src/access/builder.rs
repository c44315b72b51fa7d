//! Building keyed persistent mappings from plain records.
//!
//! Each builder makes exactly one pass over its input and writes into a
//! single transient buffer, which is frozen into the returned container.
//! When several records share a key the last one wins; in an ordered
//! mapping the key keeps the position of its first occurrence.

use crate::persistent::{PersistentHashMap, TransientHashMap, TransientOrderedMap};
use crate::value::{Container, Key, Value, from_plain};

use super::error::{BuildError, UnhashableKeyError};

/// Key field used when none is configured.
pub const DEFAULT_KEY_FIELD: &str = "id";

/// Configuration for [`map_items`].
///
/// | field        | default |
/// |--------------|---------|
/// | `key`        | `"id"`  |
/// | `keep_order` | `false` |
/// | `value_key`  | `None`  |
///
/// # Examples
///
/// ```rust
/// use persistent_access::access::MapItemsOptions;
///
/// let options = MapItemsOptions::new()
///     .with_key("code")
///     .keep_order(true)
///     .project("label");
///
/// assert_eq!(options.key, "code");
/// assert!(options.keep_order);
/// assert_eq!(options.value_key.as_deref(), Some("label"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapItemsOptions {
    /// Record field whose value becomes the map key.
    pub key: String,
    /// Build an insertion-ordered map instead of an unordered one.
    pub keep_order: bool,
    /// Store this raw field instead of the whole converted record.
    pub value_key: Option<String>,
}

impl MapItemsOptions {
    /// Returns the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the key field.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Selects the insertion-ordered variant.
    #[must_use]
    pub fn keep_order(mut self, keep_order: bool) -> Self {
        self.keep_order = keep_order;
        self
    }

    /// Projects a single field. An empty name clears the projection.
    #[must_use]
    pub fn project(mut self, value_key: impl Into<String>) -> Self {
        let value_key = value_key.into();
        self.value_key = (!value_key.is_empty()).then_some(value_key);
        self
    }
}

impl Default for MapItemsOptions {
    fn default() -> Self {
        Self {
            key: DEFAULT_KEY_FIELD.to_owned(),
            keep_order: false,
            value_key: None,
        }
    }
}

/// A transient keyed buffer that a builder pass writes into.
trait KeyedBuffer: Default {
    fn put(&mut self, key: Key, value: Value);

    fn freeze(self) -> Container;
}

impl KeyedBuffer for TransientHashMap<Key, Value> {
    fn put(&mut self, key: Key, value: Value) {
        self.insert(key, value);
    }

    fn freeze(self) -> Container {
        Container::Map(self.persistent())
    }
}

impl KeyedBuffer for TransientOrderedMap<Key, Value> {
    fn put(&mut self, key: Key, value: Value) {
        self.insert(key, value);
    }

    fn freeze(self) -> Container {
        Container::OrderedMap(self.persistent())
    }
}

/// Converts records into an unordered map from `item[key]` to the
/// deep-converted record.
///
/// # Errors
///
/// Returns [`BuildError::UnhashableKey`] if a record's key field holds an
/// array or object.
///
/// # Examples
///
/// ```rust
/// use persistent_access::access::{DEFAULT_KEY_FIELD, convert_to_map};
/// use persistent_access::value::{Key, from_plain};
/// use serde_json::json;
///
/// let items = [json!({"id": 1, "x": "a"}), json!({"id": 1, "x": "c"})];
/// let map = convert_to_map(&items, DEFAULT_KEY_FIELD).unwrap();
///
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.get(&Key::from(1)), Some(&from_plain(json!({"id": 1, "x": "c"}))));
/// ```
pub fn convert_to_map(
    items: &[serde_json::Value],
    key: &str,
) -> Result<PersistentHashMap<Key, Value>, BuildError> {
    let buffer: TransientHashMap<Key, Value> = fill(items, key, None)?;
    let map = buffer.persistent();
    tracing::trace!(items = items.len(), size = map.len(), "converted records to map");
    Ok(map)
}

/// Converts records into a keyed container configured by `options`.
///
/// `None` yields an empty container of the requested variant without
/// iterating. With a projection (`value_key`), each entry holds the raw
/// plain field, or plain `null` if the record lacks it; otherwise each
/// entry holds the deep-converted record.
///
/// # Errors
///
/// Returns [`BuildError::UnhashableKey`] if a record's key field holds an
/// array or object.
///
/// # Examples
///
/// ```rust
/// use persistent_access::access::{MapItemsOptions, map_items};
/// use persistent_access::value::{Container, Key, Value};
/// use serde_json::json;
///
/// let items = [json!({"id": 1, "name": "A"}), json!({"id": 2, "name": "B"})];
/// let options = MapItemsOptions::new().keep_order(true).project("name");
/// let mapping = map_items(Some(&items[..]), &options).unwrap();
///
/// assert!(matches!(mapping, Container::OrderedMap(_)));
/// assert_eq!(mapping.get(&Key::from(2)), Some(&Value::from(json!("B"))));
///
/// let empty = map_items(None, &options).unwrap();
/// assert!(empty.is_empty());
/// ```
pub fn map_items(
    items: Option<&[serde_json::Value]>,
    options: &MapItemsOptions,
) -> Result<Container, BuildError> {
    let items = items.unwrap_or_default();
    let value_key = options.value_key.as_deref();

    let container = if options.keep_order {
        fill::<TransientOrderedMap<Key, Value>>(items, &options.key, value_key)?.freeze()
    } else {
        fill::<TransientHashMap<Key, Value>>(items, &options.key, value_key)?.freeze()
    };

    tracing::trace!(
        items = items.len(),
        size = container.len(),
        ordered = options.keep_order,
        projected = value_key.is_some(),
        "mapped records"
    );
    Ok(container)
}

fn fill<B: KeyedBuffer>(
    items: &[serde_json::Value],
    key_field: &str,
    value_key: Option<&str>,
) -> Result<B, BuildError> {
    let mut buffer = B::default();
    for (index, item) in items.iter().enumerate() {
        let key = record_key(item, key_field, index)?;
        let value = match value_key {
            Some(field) => Value::Plain(item.get(field).cloned().unwrap_or_default()),
            None => from_plain(item.clone()),
        };
        buffer.put(key, value);
    }
    Ok(buffer)
}

/// Reads the key field of one record.
///
/// Records that are not objects, or lack the field, are keyed under
/// [`Key::Null`].
fn record_key(item: &serde_json::Value, field: &str, index: usize) -> Result<Key, BuildError> {
    let Some(plain) = item.get(field) else {
        tracing::debug!(index, field, "record has no key field; keying it under null");
        return Ok(Key::Null);
    };

    Key::from_plain(plain).ok_or_else(|| {
        tracing::debug!(index, field, "record key field is not a scalar");
        BuildError::from(UnhashableKeyError {
            index,
            field: field.to_owned(),
        })
    })
}
