//! Keys and key paths.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;

use serde_json::Number;

/// A hashable key into a [`Container`](super::Container).
///
/// Keys are the scalar subset of plain JSON values. Integral floating-point
/// numbers are normalised to integers, so `1` and `1.0` address the same
/// entry. Equality and hashing compare the normalised form, including for
/// keys built directly through [`Key::Number`].
///
/// # Examples
///
/// ```rust
/// use persistent_access::value::Key;
///
/// assert_eq!(Key::from(1), Key::from_plain(&serde_json::json!(1.0)).unwrap());
/// assert!(Key::from_plain(&serde_json::json!([1, 2])).is_none());
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// The null key; also stands in for a missing key field.
    Null,
    /// A boolean key.
    Bool(bool),
    /// A numeric key.
    Number(Number),
    /// A string key.
    String(String),
}

impl Key {
    /// Converts a scalar plain value into a key.
    ///
    /// Returns `None` for arrays and objects, which have no value identity
    /// usable as a key.
    #[must_use]
    pub fn from_plain(plain: &serde_json::Value) -> Option<Self> {
        match plain {
            serde_json::Value::Null => Some(Self::Null),
            serde_json::Value::Bool(flag) => Some(Self::Bool(*flag)),
            serde_json::Value::Number(number) => Some(Self::from(number.clone())),
            serde_json::Value::String(text) => Some(Self::String(text.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    /// Returns `false` for `Null`, `false`, zero and the empty string.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(flag) => *flag,
            Self::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
            Self::String(text) => !text.is_empty(),
        }
    }

    /// Converts the key back into a plain value.
    #[must_use]
    pub fn to_plain(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(flag) => serde_json::Value::Bool(*flag),
            Self::Number(number) => serde_json::Value::Number(normalize(number)),
            Self::String(text) => serde_json::Value::String(text.clone()),
        }
    }
}

/// Collapses integral floats onto the integer representation.
///
/// Non-negative values map onto `u64`, negative ones onto `i64`; floats
/// outside both ranges are kept as they are.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub(super) fn normalize(number: &Number) -> Number {
    match number.as_f64() {
        Some(value) if number.is_f64() && value.fract() == 0.0 => {
            if value >= 0.0 && value < u64::MAX as f64 {
                Number::from(value as u64)
            } else if value < 0.0 && value >= i64::MIN as f64 {
                Number::from(value as i64)
            } else {
                number.clone()
            }
        }
        _ => number.clone(),
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(left), Self::Bool(right)) => left == right,
            (Self::Number(left), Self::Number(right)) => normalize(left) == normalize(right),
            (Self::String(left), Self::String(right)) => left == right,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(flag) => flag.hash(state),
            Self::Number(number) => normalize(number).hash(state),
            Self::String(text) => text.hash(state),
        }
    }
}

impl From<Number> for Key {
    fn from(number: Number) -> Self {
        Self::Number(normalize(&number))
    }
}

impl From<&str> for Key {
    fn from(text: &str) -> Self {
        Self::String(text.to_owned())
    }
}

impl From<String> for Key {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl From<bool> for Key {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

macro_rules! key_from_integer {
    ($($integer:ty),* $(,)?) => {
        $(
            impl From<$integer> for Key {
                fn from(value: $integer) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

key_from_integer!(i32, i64, u32, u64, usize);

/// Map keys render the way they appear as JSON object keys: strings bare,
/// everything else in its JSON text form.
impl fmt::Display for Key {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => formatter.write_str("null"),
            Self::Bool(flag) => write!(formatter, "{flag}"),
            Self::Number(number) => write!(formatter, "{}", normalize(number)),
            Self::String(text) => formatter.write_str(text),
        }
    }
}

/// A location inside a container: one key, or a sequence of keys walked
/// through nested containers.
///
/// # Examples
///
/// ```rust
/// use persistent_access::value::{Key, KeyPath};
///
/// let single = KeyPath::from("name");
/// let nested = KeyPath::from(["data", "name"]);
///
/// assert_eq!(single, KeyPath::Key(Key::from("name")));
/// assert_eq!(nested, KeyPath::path(["data", "name"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPath {
    /// A single-level lookup.
    Key(Key),
    /// A nested lookup, outermost key first.
    Path(Vec<Key>),
}

impl KeyPath {
    /// Builds a nested path from anything convertible into keys.
    pub fn path<I>(keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        Self::Path(keys.into_iter().map(Into::into).collect())
    }

    /// A path is falsy when it is a single falsy key or has no segments.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Key(key) => key.is_truthy(),
            Self::Path(keys) => !keys.is_empty(),
        }
    }
}

impl From<Key> for KeyPath {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl From<Vec<Key>> for KeyPath {
    fn from(keys: Vec<Key>) -> Self {
        Self::Path(keys)
    }
}

impl<const N: usize> From<[&str; N]> for KeyPath {
    fn from(keys: [&str; N]) -> Self {
        Self::path(keys)
    }
}

macro_rules! key_path_from_scalar {
    ($($scalar:ty),* $(,)?) => {
        $(
            impl From<$scalar> for KeyPath {
                fn from(value: $scalar) -> Self {
                    Self::Key(Key::from(value))
                }
            }
        )*
    };
}

key_path_from_scalar!(&str, String, bool, i32, i64, u32, u64, usize);
