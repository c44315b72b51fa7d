//! # persistent-access
//!
//! Safe, polymorphic access into persistent (structurally shared,
//! copy-on-write) containers, and builders that turn plain records into
//! keyed persistent mappings.
//!
//! ## Overview
//!
//! - **Value model**: [`value::Value`] is either plain data or a
//!   [`value::Container`]; [`value::from_plain`] deep-converts plain data.
//! - **Access**: capability checks, curried `has`/`get`, and resolvers that
//!   fall back instead of failing when handed something that is not a
//!   container.
//! - **Builders**: one transient pass from records to a keyed map,
//!   optionally insertion-ordered, optionally projecting one field.
//! - **Persistent Data Structures**: HAMT map, insertion-ordered map and
//!   sequence, each with a transient batch builder.
//!
//! ## Feature Flags
//!
//! - `arc`: use `Arc` instead of `Rc`, making containers `Send + Sync`
//! - `fxhash`: hash keys with `FxHasher`
//! - `serde`: `Serialize` for values, containers and keys
//!
//! ## Example
//!
//! ```rust
//! use persistent_access::prelude::*;
//! use serde_json::json;
//!
//! let items = [json!({"id": 1, "x": "a"}), json!({"id": 2, "x": "b"})];
//! let map = Value::from(Container::from(convert_to_map(&items, DEFAULT_KEY_FIELD).unwrap()));
//!
//! assert!(is_container(&map));
//! assert_eq!(
//!     get_valid_path(&map, Some(&KeyPath::path([Key::from(2), Key::from("x")])), None),
//!     Some(&Value::from(json!("b"))),
//! );
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// ```rust
/// use persistent_access::prelude::*;
/// ```
pub mod prelude {
    pub use crate::access::*;
    pub use crate::persistent::*;
    pub use crate::value::*;
}

pub mod access;
pub mod persistent;
pub mod value;
