//! # statreg-core — Foundational Types for the Statutory Register Stack
//!
//! This crate is the bedrock of the workspace. It defines the primitives
//! every other crate builds on: identifier newtypes, the UTC-only
//! `Timestamp`, and the boundary coercion functions that turn wire strings
//! into typed values exactly once, at the edge.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain identifiers.** `CompanyId`, `RecordId`,
//!    `UserId`, `ActivityId` — you cannot pass a company where a record is
//!    expected. No bare UUIDs in signatures.
//!
//! 2. **UTC-only timestamps.** The `Timestamp` type enforces UTC with
//!    seconds precision. Bare dates (`2025-01-01`) resolve to UTC midnight.
//!
//! 3. **Coercion happens once.** All string→typed conversion flows through
//!    [`coerce`]; past that boundary counts are `i64`, amounts are `f64`,
//!    flags are `bool`, dates are [`Timestamp`]. Stored records never hold
//!    raw wire strings for these fields.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `statreg-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, `Serialize`/`Deserialize`.

pub mod coerce;
pub mod domain;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use domain::{RegisterKind, REGISTER_KIND_COUNT};
pub use error::ValidationError;
pub use identity::{ActivityId, CompanyId, RecordId, UserId};
pub use temporal::Timestamp;
