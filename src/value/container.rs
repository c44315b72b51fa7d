//! The persistent container family.

use crate::persistent::{PersistentHashMap, PersistentOrderedMap, PersistentSequence};

use super::key::normalize;
use super::{Key, Value};

/// A persistent associative container.
///
/// Every variant answers `has`, `get` and `get_in`. Map variants look keys
/// up by hash; `List` addresses elements by position.
///
/// # Examples
///
/// ```rust
/// use persistent_access::value::{from_plain, Key, Value};
/// use serde_json::json;
///
/// let value = from_plain(json!({"data": {"name": "ada"}}));
/// let container = value.as_container().unwrap();
///
/// assert!(container.has(&Key::from("data")));
/// assert_eq!(
///     container.get_in(&[Key::from("data"), Key::from("name")]),
///     Some(&Value::from(json!("ada"))),
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    /// Unordered map.
    Map(PersistentHashMap<Key, Value>),
    /// Map iterating in first-insertion order.
    OrderedMap(PersistentOrderedMap<Key, Value>),
    /// Positional sequence.
    List(PersistentSequence<Value>),
}

impl Container {
    /// Returns the number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        match self {
            Self::Map(map) => map.len(),
            Self::OrderedMap(map) => map.len(),
            Self::List(list) => list.len(),
        }
    }

    /// Returns `true` if the container holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if iteration order is meaningful for this variant.
    ///
    /// ```rust
    /// use persistent_access::access::{MapItemsOptions, map_items};
    /// use serde_json::json;
    ///
    /// let items = [json!({"id": 1})];
    /// let ordered = map_items(Some(&items[..]), &MapItemsOptions::new().keep_order(true)).unwrap();
    /// let unordered = map_items(Some(&items[..]), &MapItemsOptions::new()).unwrap();
    ///
    /// assert!(ordered.is_ordered());
    /// assert!(!unordered.is_ordered());
    /// ```
    #[must_use]
    pub const fn is_ordered(&self) -> bool {
        matches!(self, Self::OrderedMap(_) | Self::List(_))
    }

    /// Returns `true` if `key` is present.
    #[must_use]
    pub fn has(&self, key: &Key) -> bool {
        self.get(key).is_some()
    }

    /// Returns the value stored at `key`.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&Value> {
        match self {
            Self::Map(map) => map.get(key),
            Self::OrderedMap(map) => map.get(key),
            Self::List(list) => list_index(key, list.len()).and_then(|index| list.get(index)),
        }
    }

    /// Returns the value stored at `key`, or `default` when absent.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &Key, default: Option<&'a Value>) -> Option<&'a Value> {
        self.get(key).or(default)
    }

    /// Walks `path` through nested containers.
    ///
    /// Returns `None` if a segment is missing, if an intermediate value is
    /// not a container, or if `path` is empty.
    #[must_use]
    pub fn get_in(&self, path: &[Key]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        self.get(first)?.get_in(rest)
    }

    /// Walks `path` through nested containers, or returns `default`.
    #[must_use]
    pub fn get_in_or<'a>(&'a self, path: &[Key], default: Option<&'a Value>) -> Option<&'a Value> {
        self.get_in(path).or(default)
    }

    /// Returns an iterator over entries. `List` entries are keyed by index.
    pub fn iter(&self) -> Box<dyn Iterator<Item = (Key, &Value)> + '_> {
        match self {
            Self::Map(map) => Box::new(map.iter().map(|(key, value)| (key.clone(), value))),
            Self::OrderedMap(map) => Box::new(map.iter().map(|(key, value)| (key.clone(), value))),
            Self::List(list) => Box::new(
                list.iter()
                    .enumerate()
                    .map(|(index, value)| (Key::from(index), value)),
            ),
        }
    }

    /// Deeply converts the container back into plain data.
    ///
    /// Map keys become JSON object keys through their `Display` form, so
    /// keys with the same text merge: `Key::Null` and `"null"`, or
    /// `Key::from(1)` and `"1"`, end up as one field holding whichever
    /// entry was rendered last. This only inverts [`from_plain`] for
    /// maps whose keys are all strings.
    ///
    /// [`from_plain`]: super::from_plain
    #[must_use]
    pub fn to_plain(&self) -> serde_json::Value {
        match self {
            Self::Map(_) | Self::OrderedMap(_) => serde_json::Value::Object(
                self.iter()
                    .map(|(key, value)| (key.to_string(), value.to_plain()))
                    .collect(),
            ),
            Self::List(list) => {
                serde_json::Value::Array(list.iter().map(Value::to_plain).collect())
            }
        }
    }
}

/// Resolves a key to a list position.
///
/// Negative numbers count from the end. Strings must hold a canonical
/// non-negative integer below `u32::MAX`.
fn list_index(key: &Key, length: usize) -> Option<usize> {
    match key {
        Key::Number(number) => {
            let number = normalize(number);
            if let Some(index) = number.as_u64() {
                usize::try_from(index).ok()
            } else {
                let index = number.as_i64()?;
                let from_end = usize::try_from(index.unsigned_abs()).ok()?;
                length.checked_sub(from_end)
            }
        }
        Key::String(text) => text
            .parse::<u32>()
            .ok()
            .filter(|index| *index != u32::MAX && index.to_string() == *text)
            .and_then(|index| usize::try_from(index).ok()),
        Key::Null | Key::Bool(_) => None,
    }
}

impl From<PersistentHashMap<Key, Value>> for Container {
    fn from(map: PersistentHashMap<Key, Value>) -> Self {
        Self::Map(map)
    }
}

impl From<PersistentOrderedMap<Key, Value>> for Container {
    fn from(map: PersistentOrderedMap<Key, Value>) -> Self {
        Self::OrderedMap(map)
    }
}

impl From<PersistentSequence<Value>> for Container {
    fn from(list: PersistentSequence<Value>) -> Self {
        Self::List(list)
    }
}
