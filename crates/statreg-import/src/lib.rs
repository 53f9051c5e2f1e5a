//! # statreg-import — Two-Phase CSV Bulk Import
//!
//! Bulk ingestion of register records in two explicit phases:
//!
//! 1. **Preview** — parse the uploaded CSV into candidate drafts using
//!    the same coercion the mutation path uses. Nothing is persisted.
//!    Rows that fail to parse are reported per row, never dropped.
//! 2. **Confirm** — commit the previously previewed rows and append one
//!    `imported` activity entry summarising the batch.
//!
//! ## Design Decision
//!
//! The confirm call carries only the company id — no file and no batch
//! reference — so the server must know which rows were previewed. The
//! staged batch lives server-side, keyed by `(company, actor)`: a new
//! preview deterministically replaces any previous batch for that key,
//! and confirm consumes the batch atomically. Confirming with nothing
//! staged is a validation error, not a silent no-op.

pub mod csv;
pub mod error;
pub mod pipeline;
pub mod staging;

pub use csv::{parse_csv, CsvDraft, ParsedCsv, RowError};
pub use error::ImportError;
pub use pipeline::{
    CommitError, ImportOutcome, ImportPhase, ImportPipeline, ImportPreview, ImportSession,
};
pub use staging::StagingArea;
