//! Error type for fixed-key records.

use thiserror::Error;

use super::RecordMode;

/// Errors raised by [`Schema`](super::Schema), [`RecordFactory`](super::RecordFactory)
/// and [`Record`](super::Record).
///
/// Schema and arity errors happen at construction and no partial value is
/// returned. Lookups (`get`, `contains_key`, `remove`) treat unknown keys as
/// absent instead of failing; only `put` rejects them.
///
/// # Examples
///
/// ```rust
/// use fixed_key_map::fixed::{FixedMapError, Schema};
///
/// let error = Schema::new(["id", "name", "id"]).unwrap_err();
/// assert_eq!(
///     error,
///     FixedMapError::InvalidSchema { duplicates: vec!["id".to_string()] }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixedMapError {
    /// The declared keys are not unique. Each duplicated key is listed once.
    #[error("keys must be unique, but these keys are duplicated: {duplicates:?}")]
    InvalidSchema {
        /// The keys declared more than once.
        duplicates: Vec<String>,
    },

    /// The number of supplied values differs from the number of keys.
    #[error("schema declares {expected} keys, but {actual} values were supplied")]
    ArityMismatch {
        /// Number of declared keys.
        expected: usize,
        /// Number of supplied values.
        actual: usize,
    },

    /// The key is not declared by the schema.
    #[error("unknown key: {key}")]
    UnknownKey {
        /// The rejected key.
        key: String,
    },

    /// The operation is not available in the record's mode.
    #[error("{operation} is not supported on a {mode} record")]
    UnsupportedOperation {
        /// Name of the rejected operation.
        operation: &'static str,
        /// Mode of the record that rejected it.
        mode: RecordMode,
    },
}

impl FixedMapError {
    pub(crate) fn unknown_key(key: &str) -> Self {
        Self::UnknownKey {
            key: key.to_owned(),
        }
    }
}
