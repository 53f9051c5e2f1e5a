//! # Register of Beneficial Owners
//!
//! Persons with significant control: who they are, the nature of their
//! control, and what share of ownership they were notified with.

use serde::{Deserialize, Serialize};

use statreg_core::{coerce, CompanyId, RecordId, RegisterKind, Timestamp};

use crate::error::RegisterError;
use crate::register::{Register, TransitionOutcome};

/// Lifecycle of a beneficial-owner entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeneficialOwnerStatus {
    /// Currently registered.
    Active,
    /// Control ceased; retained for history.
    Ceased,
}

impl std::fmt::Display for BeneficialOwnerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Ceased => f.write_str("Ceased"),
        }
    }
}

/// A beneficial owner record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeneficialOwner {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Lifecycle status.
    pub status: BeneficialOwnerStatus,
    /// Owner name.
    pub name: String,
    /// Ownership share, percent (0–100).
    pub ownership_percent: f64,
    /// Nature of control, as filed (e.g. "ownership-of-shares-75-to-100").
    pub nature_of_control: String,
    /// Date the company was notified of the control.
    pub notified_date: Timestamp,
    /// Date control ceased, once ceased.
    pub ceased_date: Option<Timestamp>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last written.
    pub updated_at: Timestamp,
}

/// Wire draft for a beneficial owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeneficialOwnerDraft {
    /// Owner name.
    pub name: String,
    /// Ownership percent, as a decimal string within 0–100.
    pub ownership_percent: String,
    /// Nature of control.
    pub nature_of_control: String,
    /// Notification date, `YYYY-MM-DD` or RFC 3339.
    pub notified_date: String,
}

/// Status-transition request for a beneficial owner.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status")]
pub enum BeneficialOwnerTransition {
    /// Control ceased on the given date.
    Ceased {
        /// Date control ceased, `YYYY-MM-DD` or RFC 3339.
        ceased_date: String,
    },
}

impl Register for BeneficialOwner {
    const KIND: RegisterKind = RegisterKind::BeneficialOwner;

    type Draft = BeneficialOwnerDraft;
    type Transition = BeneficialOwnerTransition;

    fn create(
        id: RecordId,
        company_id: CompanyId,
        draft: Self::Draft,
    ) -> Result<Self, RegisterError> {
        let now = Timestamp::now();
        Ok(Self {
            id,
            company_id,
            status: BeneficialOwnerStatus::Active,
            name: coerce::text("name", &draft.name)?,
            ownership_percent: coerce::percentage("ownership_percent", &draft.ownership_percent)?,
            nature_of_control: coerce::text("nature_of_control", &draft.nature_of_control)?,
            notified_date: coerce::date("notified_date", &draft.notified_date)?,
            ceased_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&mut self, draft: Self::Draft) -> Result<(), RegisterError> {
        self.name = coerce::text("name", &draft.name)?;
        self.ownership_percent =
            coerce::percentage("ownership_percent", &draft.ownership_percent)?;
        self.nature_of_control = coerce::text("nature_of_control", &draft.nature_of_control)?;
        self.notified_date = coerce::date("notified_date", &draft.notified_date)?;
        Ok(())
    }

    fn apply(&mut self, transition: Self::Transition) -> Result<TransitionOutcome, RegisterError> {
        match transition {
            BeneficialOwnerTransition::Ceased { ceased_date } => match self.status {
                BeneficialOwnerStatus::Ceased => Ok(TransitionOutcome::Unchanged),
                BeneficialOwnerStatus::Active => {
                    let date = coerce::date("ceased_date", &ceased_date)?;
                    self.status = BeneficialOwnerStatus::Ceased;
                    self.ceased_date = Some(date);
                    Ok(TransitionOutcome::Applied {
                        description: format!("beneficial owner {} ceased", self.name),
                    })
                }
            },
        }
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn company_id(&self) -> CompanyId {
        self.company_id
    }

    fn touch(&mut self, at: Timestamp) {
        self.updated_at = at;
    }

    fn describe(&self) -> String {
        format!(
            "beneficial owner {} ({}% {})",
            self.name, self.ownership_percent, self.nature_of_control
        )
    }
}
