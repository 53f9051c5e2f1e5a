//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from statreg-registers, statreg-authz, and
//! statreg-import to HTTP status codes. Returns JSON error response
//! bodies with error code and message. Never exposes internal error
//! details in responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
///
/// Maps domain errors to appropriate HTTP status codes and structured
/// JSON error bodies. Internal and dependency error details are never
/// exposed to clients.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation or field coercion failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Authentication failure — missing or invalid identity (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authorization failure — insufficient permission or company-scope
    /// mismatch (403).
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),

    /// The backing store is unavailable or returned an unmapped error
    /// (503). Message is logged but not returned.
    #[error("dependency error: {0}")]
    Dependency(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for
    /// this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Dependency(_) => (StatusCode::SERVICE_UNAVAILABLE, "DEPENDENCY_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal or store-level error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            Self::Dependency(_) => "A backing service is unavailable".to_string(),
            other => other.to_string(),
        };

        // Log server-side errors for operator visibility.
        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::Dependency(_) => tracing::error!(error = %self, "dependency error"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<statreg_registers::RegisterError> for AppError {
    fn from(err: statreg_registers::RegisterError) -> Self {
        use statreg_registers::RegisterError;
        match &err {
            RegisterError::Validation(_) => Self::Validation(err.to_string()),
            RegisterError::NotFound { .. } => Self::NotFound(err.to_string()),
            RegisterError::Conflict(_) | RegisterError::InvalidTransition { .. } => {
                Self::Conflict(err.to_string())
            }
        }
    }
}

impl From<statreg_authz::AuthzError> for AppError {
    fn from(err: statreg_authz::AuthzError) -> Self {
        use statreg_authz::AuthzError;
        match &err {
            AuthzError::Unauthorized => Self::Unauthorized(err.to_string()),
            AuthzError::Forbidden { .. } | AuthzError::CompanyMismatch { .. } => {
                Self::Forbidden(err.to_string())
            }
        }
    }
}

impl From<statreg_import::ImportError> for AppError {
    fn from(err: statreg_import::ImportError) -> Self {
        use statreg_import::ImportError;
        match err {
            ImportError::EmptyFile
            | ImportError::Unreadable(_)
            | ImportError::MissingColumns(_)
            | ImportError::NothingStaged => Self::Validation(err.to_string()),
            ImportError::Phase { .. } => Self::Conflict(err.to_string()),
            ImportError::Register(inner) => inner.into(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Dependency(err.to_string())
    }
}
