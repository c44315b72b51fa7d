//! The dynamic value model.
//!
//! A [`Value`] is either untyped plain data ([`serde_json::Value`]) or a
//! persistent [`Container`]. The split is a closed tagged union, so
//! "is this a container?" is a single tag match rather than a structural
//! guess:
//!
//! ```rust
//! use persistent_access::value::{from_plain, Value};
//! use serde_json::json;
//!
//! let plain = Value::from(json!({"id": 1}));
//! let converted = from_plain(json!({"id": 1}));
//!
//! assert!(plain.as_container().is_none());
//! assert!(converted.as_container().is_some());
//! assert_eq!(converted.to_plain(), json!({"id": 1}));
//! ```
//!
//! [`from_plain`] performs the deep conversion: objects become
//! [`Container::Map`], arrays become [`Container::List`], and scalars stay
//! plain.

mod container;
mod key;

pub use container::Container;
pub use key::{Key, KeyPath};

use crate::persistent::{TransientHashMap, TransientSequence};

/// A plain value or a persistent container.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Untyped host data: null, primitives, plain arrays and plain records.
    Plain(serde_json::Value),
    /// A persistent container.
    Container(Container),
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(Value: Send, Sync);

impl Value {
    /// The plain `null` value.
    #[must_use]
    pub const fn null() -> Self {
        Self::Plain(serde_json::Value::Null)
    }

    /// Capability check: returns the container if this value is one.
    #[must_use]
    pub const fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Container(container) => Some(container),
            Self::Plain(_) => None,
        }
    }

    /// Returns the plain data if this value is not a container.
    ///
    /// ```rust
    /// use persistent_access::value::{from_plain, Value};
    /// use serde_json::json;
    ///
    /// assert_eq!(Value::from(json!([1])).as_plain(), Some(&json!([1])));
    /// assert_eq!(from_plain(json!([1])).as_plain(), None);
    /// ```
    #[must_use]
    pub const fn as_plain(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Plain(plain) => Some(plain),
            Self::Container(_) => None,
        }
    }

    /// Returns `false` for plain `null`, `false`, zero and the empty
    /// string; every other value, including every container, is truthy.
    ///
    /// ```rust
    /// use persistent_access::value::{from_plain, Value};
    /// use serde_json::json;
    ///
    /// assert!(!Value::from(json!(0)).is_truthy());
    /// assert!(!Value::null().is_truthy());
    /// assert!(from_plain(json!({})).is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Container(_) => true,
            Self::Plain(serde_json::Value::Null) => false,
            Self::Plain(serde_json::Value::Bool(flag)) => *flag,
            Self::Plain(serde_json::Value::Number(number)) => {
                number.as_f64().is_some_and(|value| value != 0.0)
            }
            Self::Plain(serde_json::Value::String(text)) => !text.is_empty(),
            Self::Plain(serde_json::Value::Array(_) | serde_json::Value::Object(_)) => true,
        }
    }

    /// Walks `path` from this value.
    ///
    /// An empty path yields the value itself; a non-empty path requires
    /// every value along the way to be a container.
    #[must_use]
    pub fn get_in(&self, path: &[Key]) -> Option<&Self> {
        match path.split_first() {
            None => Some(self),
            Some((first, rest)) => self.as_container()?.get(first)?.get_in(rest),
        }
    }

    /// Deeply converts the value back into plain data.
    ///
    /// See [`Container::to_plain`] for how map keys are rendered; keys
    /// whose text coincides are merged.
    #[must_use]
    pub fn to_plain(&self) -> serde_json::Value {
        match self {
            Self::Plain(plain) => plain.clone(),
            Self::Container(container) => container.to_plain(),
        }
    }
}

/// Deeply converts plain data into its persistent form.
///
/// Objects become [`Container::Map`] keyed by [`Key::String`], arrays become
/// [`Container::List`], and scalars are returned as [`Value::Plain`]. Each
/// nested container is built through one transient pass.
///
/// # Examples
///
/// ```rust
/// use persistent_access::value::{from_plain, Key};
/// use serde_json::json;
///
/// let value = from_plain(json!({"tags": ["a", "b"]}));
/// let tags = value.get_in(&[Key::from("tags")]).unwrap();
///
/// assert_eq!(tags.as_container().map(|container| container.len()), Some(2));
/// ```
#[must_use]
pub fn from_plain(plain: serde_json::Value) -> Value {
    match plain {
        serde_json::Value::Object(fields) => {
            let mut transient = TransientHashMap::new();
            for (field, nested) in fields {
                transient.insert(Key::String(field), from_plain(nested));
            }
            Value::Container(Container::Map(transient.persistent()))
        }
        serde_json::Value::Array(elements) => {
            let mut transient = TransientSequence::new();
            transient.extend(elements.into_iter().map(from_plain));
            Value::Container(Container::List(transient.persistent()))
        }
        scalar => Value::Plain(scalar),
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::null()
    }
}

impl From<serde_json::Value> for Value {
    /// Wraps plain data without converting it.
    fn from(plain: serde_json::Value) -> Self {
        Self::Plain(plain)
    }
}

impl From<Container> for Value {
    fn from(container: Container) -> Self {
        Self::Container(container)
    }
}

#[cfg(feature = "serde")]
mod serialize {
    use serde::ser::{SerializeMap, SerializeSeq};
    use serde::{Serialize, Serializer};

    use super::{Container, Key, Value};

    impl Serialize for Key {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.to_plain().serialize(serializer)
        }
    }

    impl Serialize for Value {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Plain(plain) => plain.serialize(serializer),
                Self::Container(container) => container.serialize(serializer),
            }
        }
    }

    /// Maps serialize with their keys rendered as text, exactly like
    /// [`Container::to_plain`], so keys with the same text merge.
    impl Serialize for Container {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self {
                Self::Map(_) | Self::OrderedMap(_) => {
                    let mut map = serializer.serialize_map(Some(self.len()))?;
                    for (key, value) in self.iter() {
                        map.serialize_entry(&key.to_string(), value)?;
                    }
                    map.end()
                }
                Self::List(list) => {
                    let mut sequence = serializer.serialize_seq(Some(list.len()))?;
                    for element in list {
                        sequence.serialize_element(element)?;
                    }
                    sequence.end()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!(false), false)]
    #[case(json!(0), false)]
    #[case(json!(0.0), false)]
    #[case(json!(""), false)]
    #[case(json!([]), true)]
    #[case(json!({}), true)]
    #[case(json!("text"), true)]
    fn test_plain_truthiness(#[case] plain: serde_json::Value, #[case] expected: bool) {
        assert_eq!(Value::from(plain).is_truthy(), expected);
    }

    #[rstest]
    fn test_empty_container_is_truthy() {
        assert!(from_plain(json!({})).is_truthy());
        assert!(from_plain(json!([])).is_truthy());
    }

    #[rstest]
    fn test_from_plain_converts_nested_structures() {
        let value = from_plain(json!({"user": {"roles": ["admin"]}, "active": true}));

        let roles = value
            .get_in(&[Key::from("user"), Key::from("roles")])
            .and_then(Value::as_container);
        assert!(matches!(roles, Some(Container::List(_))));
        assert_eq!(
            value.get_in(&[Key::from("active")]),
            Some(&Value::from(json!(true)))
        );
    }

    #[rstest]
    fn test_scalars_stay_plain() {
        assert_eq!(from_plain(json!(3)), Value::Plain(json!(3)));
        assert_eq!(from_plain(json!(null)), Value::null());
    }

    #[rstest]
    fn test_to_plain_inverts_from_plain() {
        let plain = json!({"id": 7, "tags": ["x", {"deep": null}], "name": "seven"});
        assert_eq!(from_plain(plain.clone()).to_plain(), plain);
    }

    #[cfg(feature = "serde")]
    #[rstest]
    fn test_serialize_matches_to_plain() {
        let value = from_plain(json!({"list": [1, 2], "flag": false}));
        assert_eq!(serde_json::to_value(&value).unwrap(), value.to_plain());
    }
}
