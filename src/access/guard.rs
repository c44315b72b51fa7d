//! Runtime capability checks.
//!
//! Both predicates are total: they answer `false` for anything outside
//! their variant and never panic.

use crate::value::Value;

/// Returns `true` iff `value` is a plain array.
///
/// Containers, plain objects, strings and other primitives are not
/// array-like.
///
/// # Examples
///
/// ```rust
/// use persistent_access::access::is_array_like;
/// use persistent_access::value::{from_plain, Value};
/// use serde_json::json;
///
/// assert!(is_array_like(&Value::from(json!([1, 2]))));
/// assert!(!is_array_like(&Value::from(json!({}))));
/// assert!(!is_array_like(&from_plain(json!([1, 2]))));
/// ```
#[inline]
#[must_use]
pub const fn is_array_like(value: &Value) -> bool {
    matches!(value.as_plain(), Some(serde_json::Value::Array(_)))
}

/// Returns `true` iff `value` is a persistent container.
///
/// # Examples
///
/// ```rust
/// use persistent_access::access::is_container;
/// use persistent_access::value::{from_plain, Value};
/// use serde_json::json;
///
/// assert!(is_container(&from_plain(json!({"id": 1}))));
/// assert!(!is_container(&Value::from(json!({"id": 1}))));
/// assert!(!is_container(&Value::null()));
/// ```
#[inline]
#[must_use]
pub const fn is_container(value: &Value) -> bool {
    value.as_container().is_some()
}
