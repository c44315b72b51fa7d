//! Error types for the builders.

/// A record whose key field holds an array or object.
///
/// Composite values have no value identity usable as a map key.
///
/// # Examples
///
/// ```rust
/// use persistent_access::access::UnhashableKeyError;
///
/// let error = UnhashableKeyError {
///     index: 3,
///     field: "id".to_string(),
/// };
/// assert_eq!(
///     format!("{}", error),
///     "record 3: key field `id` holds an array or object and cannot key a map"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnhashableKeyError {
    /// Position of the offending record in the input.
    pub index: usize,
    /// Name of the key field.
    pub field: String,
}

impl std::fmt::Display for UnhashableKeyError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "record {}: key field `{}` holds an array or object and cannot key a map",
            self.index, self.field
        )
    }
}

impl std::error::Error for UnhashableKeyError {}

/// Errors raised while building a keyed mapping from records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A record's key field cannot be used as a key.
    UnhashableKey(UnhashableKeyError),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnhashableKey(error) => write!(formatter, "{error}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnhashableKey(error) => Some(error),
        }
    }
}

impl From<UnhashableKeyError> for BuildError {
    fn from(error: UnhashableKeyError) -> Self {
        Self::UnhashableKey(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::error::Error;

    #[rstest]
    fn test_build_error_exposes_source() {
        let error = BuildError::from(UnhashableKeyError {
            index: 0,
            field: "id".to_string(),
        });
        assert!(error.source().is_some());
        assert_eq!(
            error.to_string(),
            "record 0: key field `id` holds an array or object and cannot key a map"
        );
    }
}
