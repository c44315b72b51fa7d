//! Resolving possibly-invalid values to containers or fallbacks.
//!
//! The resolvers check validity first and only then look anything up, so
//! a plain value is never treated as a container. Results are explicit
//! options: `None` means nothing valid was found and no fallback was given.

use crate::value::{Container, KeyPath, Value};

/// Returns `maybe` if it is a container, else `fallback` if that is a
/// container, else `None`.
///
/// The cheap variant: no lookup is performed. Use it when the value itself
/// is the container of interest.
///
/// # Examples
///
/// ```rust
/// use persistent_access::access::get_valid;
/// use persistent_access::value::{from_plain, Value};
/// use serde_json::json;
///
/// let container = from_plain(json!({"id": 1}));
/// let fallback = from_plain(json!({}));
///
/// assert_eq!(get_valid(&container, Some(&fallback)), container.as_container());
/// assert_eq!(get_valid(&Value::null(), Some(&fallback)), fallback.as_container());
/// assert_eq!(get_valid(&Value::null(), None), None);
/// ```
#[must_use]
pub fn get_valid<'a>(maybe: &'a Value, fallback: Option<&'a Value>) -> Option<&'a Container> {
    maybe
        .as_container()
        .or_else(|| fallback.and_then(Value::as_container))
}

/// Resolves `maybe` along `key_path`, falling back to `fallback`.
///
/// 1. If `maybe` is a container and `key_path` is present and truthy, the
///    value at that path (nested for [`KeyPath::Path`], single-level for
///    [`KeyPath::Key`]) or `fallback` if it is absent.
/// 2. Otherwise `maybe` itself if it is a container, else `fallback`.
///
/// A falsy key path (`0`, `""`, `false`, null, an empty path, or `None`)
/// always takes the second branch, even when the container has an entry
/// under that key.
///
/// # Examples
///
/// ```rust
/// use persistent_access::access::get_valid_path;
/// use persistent_access::value::{from_plain, KeyPath, Value};
/// use serde_json::json;
///
/// let data = from_plain(json!({"data": {"count": 42}}));
/// let fallback = Value::from(json!(0));
///
/// assert_eq!(
///     get_valid_path(&data, Some(&KeyPath::from(["data", "count"])), Some(&fallback)),
///     Some(&Value::from(json!(42))),
/// );
/// assert_eq!(
///     get_valid_path(&data, Some(&KeyPath::from(["data", "missing"])), Some(&fallback)),
///     Some(&fallback),
/// );
/// assert_eq!(get_valid_path(&data, None, None), Some(&data));
/// ```
#[must_use]
pub fn get_valid_path<'a>(
    maybe: &'a Value,
    key_path: Option<&KeyPath>,
    fallback: Option<&'a Value>,
) -> Option<&'a Value> {
    match (maybe.as_container(), key_path.filter(|path| path.is_truthy())) {
        (Some(container), Some(KeyPath::Path(keys))) => container.get_in_or(keys, fallback),
        (Some(container), Some(KeyPath::Key(key))) => container.get_or(key, fallback),
        _ => get_valid(maybe, None).map(|_| maybe).or(fallback),
    }
}
