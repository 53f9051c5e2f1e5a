//! # Request Extraction Helpers
//!
//! JSON extraction that folds body rejections into the structured error
//! taxonomy, plus the `Validate` trait for request payloads that carry
//! their own shape checks.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// A request payload that can check its own shape before the handler
/// runs domain logic.
pub trait Validate {
    /// Return a human-readable message when the payload is malformed.
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON body, mapping rejections (malformed JSON, wrong types)
/// to a validation error instead of axum's default plain-text response.
pub fn extract_json<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => Err(AppError::Validation(rejection.body_text())),
    }
}

/// Unwrap and validate a JSON body in one step.
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(body)?;
    value
        .validate()
        .map_err(AppError::Validation)?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Payload {
        name: String,
    }

    impl Validate for Payload {
        fn validate(&self) -> Result<(), String> {
            if self.name.trim().is_empty() {
                return Err("name must not be empty".to_string());
            }
            Ok(())
        }
    }

    #[test]
    fn test_valid_payload_passes() {
        let body = Ok(Json(Payload {
            name: "Acme".into(),
        }));
        assert!(extract_validated_json(body).is_ok());
    }

    #[test]
    fn test_invalid_payload_is_validation_error() {
        let body = Ok(Json(Payload { name: "  ".into() }));
        let err = extract_validated_json(body).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
