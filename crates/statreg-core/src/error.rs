//! # Validation Errors
//!
//! The error type for boundary validation and field coercion. Every
//! variant names the offending field or input so the API layer can return
//! a message the caller can act on without exposing anything internal.

use thiserror::Error;

/// A request field failed validation or coercion at the boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was absent or empty.
    #[error("field '{0}' is required")]
    MissingField(String),

    /// A field expected to hold an integer did not parse as one.
    #[error("field '{field}' must be an integer, got {value:?}")]
    InvalidInteger {
        /// The field being coerced.
        field: String,
        /// The raw wire value.
        value: String,
    },

    /// A field expected to hold a number did not parse as one.
    #[error("field '{field}' must be a number, got {value:?}")]
    InvalidNumber {
        /// The field being coerced.
        field: String,
        /// The raw wire value.
        value: String,
    },

    /// A field expected to hold a boolean did not parse as one.
    #[error("field '{field}' must be a boolean, got {value:?}")]
    InvalidBoolean {
        /// The field being coerced.
        field: String,
        /// The raw wire value.
        value: String,
    },

    /// A date input parsed as neither `YYYY-MM-DD` nor RFC 3339.
    #[error("invalid date {0:?}: expected YYYY-MM-DD or RFC 3339")]
    InvalidDate(String),

    /// A field-scoped date failure, produced by the coercion helpers.
    #[error("field '{field}' holds an invalid date {value:?}")]
    InvalidDateField {
        /// The field being coerced.
        field: String,
        /// The raw wire value.
        value: String,
    },

    /// A value was structurally valid but outside its permitted range.
    #[error("field '{field}' is out of range: {reason}")]
    OutOfRange {
        /// The field being validated.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A free-form constraint violation (non-field-specific).
    #[error("{0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_field() {
        let err = ValidationError::InvalidInteger {
            field: "number_of_shares".into(),
            value: "lots".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("number_of_shares"));
        assert!(msg.contains("lots"));
    }

    #[test]
    fn test_missing_field_message() {
        let err = ValidationError::MissingField("allottee".into());
        assert_eq!(err.to_string(), "field 'allottee' is required");
    }
}
