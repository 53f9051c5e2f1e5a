//! # The Register Trait
//!
//! The per-register strategy consumed by the generic
//! [`RegisterService`](crate::service::RegisterService). Each statutory
//! register supplies its wire draft shape, field coercion, status
//! machine, uniqueness key, and activity descriptions; the mutation
//! workflow itself is written once.

use serde::de::DeserializeOwned;
use serde::Serialize;

use statreg_core::{CompanyId, RecordId, RegisterKind, Timestamp};

use crate::error::RegisterError;

/// Result of applying a status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The status changed; `description` is the activity-log text.
    Applied {
        /// Human-readable description of what changed.
        description: String,
    },
    /// The record was already in the requested state; nothing was written
    /// and no activity is logged.
    Unchanged,
}

impl TransitionOutcome {
    /// Whether the transition actually changed the record.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// One statutory register's strategy.
///
/// Implementors are plain data records; every method that can fail
/// returns the shared [`RegisterError`] taxonomy. `create` and `update`
/// perform all field coercion — past them the record holds typed values
/// only.
pub trait Register: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Which register this record type belongs to.
    const KIND: RegisterKind;

    /// Whether records may be hard-deleted (most registers archive
    /// instead; see [`Register::deletable`] for per-record rules).
    const SUPPORTS_DELETE: bool = false;

    /// The raw wire shape: scalars arrive as strings and are coerced here.
    type Draft: DeserializeOwned + Serialize + Clone + Send + Sync + 'static;

    /// The wire shape of a status-transition request.
    type Transition: DeserializeOwned + Send + 'static;

    /// Build a new record from a draft, coercing every field. The record
    /// receives its generated id, owning company, and default status.
    fn create(
        id: RecordId,
        company_id: CompanyId,
        draft: Self::Draft,
    ) -> Result<Self, RegisterError>;

    /// Re-coerce a draft onto an existing record, preserving identity,
    /// status, and timestamps.
    fn update(&mut self, draft: Self::Draft) -> Result<(), RegisterError>;

    /// Apply a status transition. Status and its associated date are set
    /// together, or not at all. Re-confirming the current state returns
    /// [`TransitionOutcome::Unchanged`] without touching recorded dates.
    fn apply(&mut self, transition: Self::Transition) -> Result<TransitionOutcome, RegisterError>;

    /// The record identifier.
    fn id(&self) -> RecordId;

    /// The owning company.
    fn company_id(&self) -> CompanyId;

    /// Refresh the record's `updated_at` stamp.
    fn touch(&mut self, at: Timestamp);

    /// The per-company uniqueness key, when the register has one
    /// (e.g. a share class code).
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Human-readable description for create/update activity entries,
    /// e.g. "500 Ordinary shares to Ada Lovelace".
    fn describe(&self) -> String;

    /// Whether this particular record may be deleted right now.
    /// Only consulted when [`Register::SUPPORTS_DELETE`] is set.
    fn deletable(&self) -> Result<(), RegisterError> {
        Err(RegisterError::Conflict(format!(
            "{} records are archived, not deleted",
            Self::KIND
        )))
    }
}
