//! Accessors over a known-valid container.
//!
//! These take a [`Container`] rather than a [`Value`](crate::value::Value),
//! so calling them on anything else does not type-check. Each two-argument
//! accessor has a partially-applied form that binds the container first:
//!
//! ```rust
//! use persistent_access::access::{get, get_from, has, has_in};
//! use persistent_access::value::{from_plain, Key};
//! use serde_json::json;
//!
//! let value = from_plain(json!({"name": "ada"}));
//! let container = value.as_container().unwrap();
//! let name = Key::from("name");
//!
//! let has_in_container = has_in(container);
//! assert_eq!(has_in_container(&name), has(container, &name));
//!
//! let get_from_container = get_from(container);
//! assert_eq!(get_from_container(&name), get(container, &name));
//! ```

use crate::value::{Container, Key, Value};

/// Returns `true` if `key` is present in `container`.
#[inline]
#[must_use]
pub fn has(container: &Container, key: &Key) -> bool {
    container.has(key)
}

/// Returns the value stored at `key`, or `None` if absent.
#[inline]
#[must_use]
pub fn get<'a>(container: &'a Container, key: &Key) -> Option<&'a Value> {
    container.get(key)
}

/// Binds `container`, returning a predicate awaiting the key.
pub fn has_in(container: &Container) -> impl Fn(&Key) -> bool + '_ {
    move |key: &Key| has(container, key)
}

/// Binds `container`, returning a lookup awaiting the key.
pub fn get_from<'a>(container: &'a Container) -> impl Fn(&Key) -> Option<&'a Value> + 'a {
    move |key: &Key| get(container, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn test_partial_application_is_reusable() {
        let value = crate::value::from_plain(json!({"a": 1, "b": 2}));
        let container = value.as_container().unwrap();
        let lookup = get_from(container);

        assert_eq!(lookup(&Key::from("a")), Some(&Value::from(json!(1))));
        assert_eq!(lookup(&Key::from("b")), Some(&Value::from(json!(2))));
        assert_eq!(lookup(&Key::from("c")), None);
    }
}
