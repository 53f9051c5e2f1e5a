//! # Import Pipeline State Machine
//!
//! The two-phase import flow, driven through an explicit phase machine:
//!
//! ```text
//! Idle ──▶ Previewing ──▶ Previewed ──▶ Confirming ──▶ Committed
//!              │                            │
//!              ▼                            ▼
//!            Failed ◀───────────────────────┘
//! ```
//!
//! `Failed` resets to `Idle` once reported. Illegal phase moves are
//! rejected with structured errors, the same arrangement the register
//! status machines use.

use serde::Serialize;

use statreg_activity::{ActivityKind, ActivityLog};
use statreg_core::{CompanyId, RecordId, UserId};
use statreg_registers::{Register, RegisterStore};

use crate::csv::{parse_csv, CsvDraft, RowError};
use crate::error::ImportError;
use crate::staging::StagingArea;

/// The phases of one import session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImportPhase {
    /// No import in flight.
    Idle,
    /// Parsing an uploaded file.
    Previewing,
    /// Candidates staged, awaiting confirmation.
    Previewed,
    /// Committing staged candidates.
    Confirming,
    /// Batch committed (terminal for the session).
    Committed,
    /// Parse or commit failed; resets to `Idle` once reported.
    Failed,
}

impl ImportPhase {
    /// The phases reachable from this one.
    pub fn can_move_to(&self, next: ImportPhase) -> bool {
        use ImportPhase::*;
        matches!(
            (self, next),
            (Idle, Previewing)
                | (Previewing, Previewed)
                | (Previewing, Failed)
                | (Previewed, Confirming)
                | (Previewed, Previewing)
                | (Confirming, Committed)
                | (Confirming, Failed)
                | (Failed, Idle)
        )
    }
}

impl std::fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "IDLE",
            Self::Previewing => "PREVIEWING",
            Self::Previewed => "PREVIEWED",
            Self::Confirming => "CONFIRMING",
            Self::Committed => "COMMITTED",
            Self::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// One import session's phase, with validated transitions.
#[derive(Debug, Clone, Copy)]
pub struct ImportSession {
    phase: ImportPhase,
}

impl Default for ImportSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportSession {
    /// Start a session at `Idle`.
    pub fn new() -> Self {
        Self {
            phase: ImportPhase::Idle,
        }
    }

    /// Resume a session at `Previewed` (a staged batch exists).
    pub fn previewed() -> Self {
        Self {
            phase: ImportPhase::Previewed,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> ImportPhase {
        self.phase
    }

    /// Move to `next`, rejecting transitions the machine does not allow.
    pub fn advance(&mut self, next: ImportPhase) -> Result<(), ImportError> {
        if !self.phase.can_move_to(next) {
            return Err(ImportError::Phase {
                from: self.phase,
                attempted: next,
            });
        }
        self.phase = next;
        Ok(())
    }
}

/// The preview response: candidates, per-row failures, and whether a
/// batch is now staged for confirmation.
#[derive(Debug, Clone)]
pub struct ImportPreview<D> {
    /// Candidate drafts parsed from valid rows, in file order.
    pub candidates: Vec<D>,
    /// Rows that failed to parse.
    pub errors: Vec<RowError>,
    /// Whether the candidates were staged (false when no row was valid).
    pub staged: bool,
}

/// A row the confirm phase could not commit.
#[derive(Debug, Clone, Serialize)]
pub struct CommitError {
    /// 1-based position of the row within the staged batch.
    pub row: usize,
    /// Why the row was not committed.
    pub message: String,
}

/// The confirm response.
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    /// Records actually created.
    pub imported: usize,
    /// Rows skipped at commit time (uniqueness conflicts and the like).
    pub skipped: Vec<CommitError>,
}

/// The two-phase import pipeline for one register kind.
pub struct ImportPipeline<'a, R: Register>
where
    R::Draft: CsvDraft,
{
    store: &'a RegisterStore<R>,
    log: &'a ActivityLog,
    staging: &'a StagingArea<R::Draft>,
}

impl<'a, R: Register> ImportPipeline<'a, R>
where
    R::Draft: CsvDraft,
{
    /// Bind the pipeline to its store, activity log, and staging area.
    pub fn new(
        store: &'a RegisterStore<R>,
        log: &'a ActivityLog,
        staging: &'a StagingArea<R::Draft>,
    ) -> Self {
        Self {
            store,
            log,
            staging,
        }
    }

    /// Phase one: parse the uploaded file and stage the candidates.
    ///
    /// Nothing is persisted. A file-level failure clears any batch this
    /// user had staged for the company — after an error the staging state
    /// is `Idle`, never a stale earlier batch.
    pub fn preview(
        &self,
        company_id: CompanyId,
        actor: UserId,
        file: &[u8],
    ) -> Result<ImportPreview<R::Draft>, ImportError> {
        let mut session = ImportSession::new();
        session.advance(ImportPhase::Previewing)?;

        let parsed = match parse_csv::<R::Draft>(file) {
            Ok(parsed) => parsed,
            Err(e) => {
                session.advance(ImportPhase::Failed)?;
                self.staging.take(company_id, actor);
                return Err(e);
            }
        };

        session.advance(ImportPhase::Previewed)?;
        let staged = !parsed.drafts.is_empty();
        if staged {
            self.staging
                .stage(company_id, actor, parsed.drafts.clone());
        } else {
            self.staging.take(company_id, actor);
        }

        Ok(ImportPreview {
            candidates: parsed.drafts,
            errors: parsed.errors,
            staged,
        })
    }

    /// Phase two: commit the staged batch.
    ///
    /// The batch is consumed whether or not every row commits. Rows that
    /// fail at commit time (a uniqueness conflict raced in since the
    /// preview) are reported, not silently dropped. One `imported`
    /// activity entry summarises the batch.
    pub fn confirm(
        &self,
        company_id: CompanyId,
        actor: UserId,
        actor_label: &str,
    ) -> Result<ImportOutcome, ImportError> {
        let batch = self
            .staging
            .take(company_id, actor)
            .ok_or(ImportError::NothingStaged)?;

        let mut session = ImportSession::previewed();
        session.advance(ImportPhase::Confirming)?;

        let mut imported = 0usize;
        let mut skipped = Vec::new();

        for (index, draft) in batch.drafts.into_iter().enumerate() {
            match self.commit_row(company_id, draft) {
                Ok(()) => imported += 1,
                Err(e) => skipped.push(CommitError {
                    row: index + 1,
                    message: e.to_string(),
                }),
            }
        }

        session.advance(ImportPhase::Committed)?;

        if imported > 0 {
            let description = format!("imported {imported} {} record(s)", R::KIND);
            if let Err(e) = self.log.record(
                company_id,
                ActivityKind::Imported,
                R::KIND,
                None,
                description,
                actor_label,
            ) {
                tracing::warn!(
                    register = %R::KIND,
                    error = %e,
                    "activity append failed; import already committed"
                );
            }
        }

        Ok(ImportOutcome { imported, skipped })
    }

    /// Commit one staged draft without a per-row activity entry — the
    /// batch gets a single summarising entry instead.
    fn commit_row(
        &self,
        company_id: CompanyId,
        draft: R::Draft,
    ) -> Result<(), statreg_registers::RegisterError> {
        let record = R::create(RecordId::new(), company_id, draft)?;
        if let Some(key) = record.unique_key() {
            if self.store.has_unique_conflict(company_id, &key, None) {
                return Err(statreg_registers::RegisterError::Conflict(format!(
                    "{} '{key}' already exists for this company",
                    R::KIND
                )));
            }
        }
        self.store.insert(record);
        Ok(())
    }
}
