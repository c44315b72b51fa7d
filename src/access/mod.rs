//! Safe access into persistent containers.
//!
//! - [`guard`]: capability checks ([`is_array_like`], [`is_container`])
//! - [`accessor`]: [`has`] and [`get`] over a known container, plus their
//!   partially-applied forms [`has_in`] and [`get_from`]
//! - [`resolve`]: [`get_valid`] and [`get_valid_path`], which accept any
//!   [`Value`](crate::value::Value) and fall back instead of failing
//! - [`builder`]: [`convert_to_map`] and [`map_items`], which turn plain
//!   records into keyed persistent mappings
//!
//! # Examples
//!
//! ```rust
//! use persistent_access::access::{MapItemsOptions, get_valid_path, map_items};
//! use persistent_access::value::{KeyPath, Value};
//! use serde_json::json;
//!
//! let users = [
//!     json!({"id": "ada", "profile": {"lang": "en"}}),
//!     json!({"id": "grace", "profile": {"lang": "fr"}}),
//! ];
//! let by_id = Value::from(map_items(Some(&users[..]), &MapItemsOptions::new()).unwrap());
//!
//! let path = KeyPath::from(["grace", "profile", "lang"]);
//! assert_eq!(get_valid_path(&by_id, Some(&path), None), Some(&Value::from(json!("fr"))));
//! ```

pub mod accessor;
pub mod builder;
pub mod error;
pub mod guard;
pub mod resolve;

pub use accessor::{get, get_from, has, has_in};
pub use builder::{DEFAULT_KEY_FIELD, MapItemsOptions, convert_to_map, map_items};
pub use error::{BuildError, UnhashableKeyError};
pub use guard::{is_array_like, is_container};
pub use resolve::{get_valid, get_valid_path};
