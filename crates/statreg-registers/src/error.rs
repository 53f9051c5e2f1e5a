//! # Register Mutation Errors
//!
//! The error taxonomy every mutation surfaces. The API layer maps these
//! onto HTTP statuses; nothing here carries store internals.

use thiserror::Error;

use statreg_core::{RecordId, RegisterKind, ValidationError};

/// Failure of a register mutation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegisterError {
    /// A draft field was absent or failed coercion.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The `(record, company)` pair does not resolve.
    #[error("{kind} {id} not found")]
    NotFound {
        /// The register that was searched.
        kind: RegisterKind,
        /// The record that was requested.
        id: RecordId,
    },

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The requested status transition is not legal from the current state.
    #[error("{kind} cannot move from {from} to {to}")]
    InvalidTransition {
        /// The register the record belongs to.
        kind: RegisterKind,
        /// Current status name.
        from: String,
        /// Attempted target status name.
        to: String,
    },
}

impl RegisterError {
    /// Shorthand for the not-found case.
    pub fn not_found(kind: RegisterKind, id: RecordId) -> Self {
        Self::NotFound { kind, id }
    }
}
