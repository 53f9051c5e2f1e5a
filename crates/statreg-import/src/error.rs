//! # Import Pipeline Errors

use thiserror::Error;

use statreg_registers::RegisterError;

use crate::pipeline::ImportPhase;

/// Failure of a bulk import operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    /// The uploaded file contained no data rows.
    #[error("the uploaded file contains no rows")]
    EmptyFile,

    /// The file could not be read as CSV at all.
    #[error("the uploaded file is not readable as CSV: {0}")]
    Unreadable(String),

    /// The header row is missing columns this register's import requires.
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Confirm was called with no previewed batch staged.
    #[error("no previewed import is staged for this company and user")]
    NothingStaged,

    /// The pipeline was driven through an illegal phase transition.
    #[error("import cannot move from {from} to {attempted}")]
    Phase {
        /// The phase the session was in.
        from: ImportPhase,
        /// The phase that was requested.
        attempted: ImportPhase,
    },

    /// A register mutation failed during commit.
    #[error(transparent)]
    Register(#[from] RegisterError),
}
