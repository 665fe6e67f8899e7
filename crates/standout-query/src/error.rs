//! Error types for the query crate.

use thiserror::Error;

/// Errors that can occur while turning filter values into predicates.
///
/// Unknown fields and unknown operators are not errors: the evaluator skips
/// the former and treats the latter as equality.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Filter value has the wrong type for the field it targets.
    #[error("type mismatch on field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Time value matched none of the supported formats.
    #[error("unable to parse time value: {value}")]
    UnparseableTime { value: String },

    /// Decoded value has a shape filters cannot carry.
    #[error("invalid filter value: {0}")]
    InvalidValue(String),
}

impl QueryError {
    pub(crate) fn type_mismatch(
        field: &str,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        QueryError::TypeMismatch {
            field: field.to_string(),
            expected,
            actual,
        }
    }
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
