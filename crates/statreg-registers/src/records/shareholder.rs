//! # Register of Members
//!
//! Shareholders on a company's register of members. A member who
//! transfers away their last holding ceases rather than disappearing.

use serde::{Deserialize, Serialize};

use statreg_core::{coerce, CompanyId, RecordId, RegisterKind, Timestamp};

use crate::error::RegisterError;
use crate::register::{Register, TransitionOutcome};

/// Lifecycle of a register-of-members entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareholderStatus {
    /// Currently a member.
    Active,
    /// No longer a member; retained for history.
    Ceased,
}

impl std::fmt::Display for ShareholderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Ceased => f.write_str("Ceased"),
        }
    }
}

/// A shareholder record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shareholder {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Lifecycle status.
    pub status: ShareholderStatus,
    /// Member name.
    pub name: String,
    /// Share class code held.
    pub share_class: String,
    /// Number of shares held.
    pub shares_held: i64,
    /// Date the member was entered on the register.
    pub acquired_date: Timestamp,
    /// Date the member ceased, once ceased.
    pub cessation_date: Option<Timestamp>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last written.
    pub updated_at: Timestamp,
}

/// Wire draft for a shareholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareholderDraft {
    /// Member name.
    pub name: String,
    /// Share class code held.
    pub share_class: String,
    /// Number of shares held, as a decimal integer string.
    pub shares_held: String,
    /// Acquisition date, `YYYY-MM-DD` or RFC 3339.
    pub acquired_date: String,
}

/// Status-transition request for a shareholder.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status")]
pub enum ShareholderTransition {
    /// The member ceased on the given date.
    Ceased {
        /// Date of cessation, `YYYY-MM-DD` or RFC 3339.
        cessation_date: String,
    },
}

impl Register for Shareholder {
    const KIND: RegisterKind = RegisterKind::Shareholder;

    type Draft = ShareholderDraft;
    type Transition = ShareholderTransition;

    fn create(
        id: RecordId,
        company_id: CompanyId,
        draft: Self::Draft,
    ) -> Result<Self, RegisterError> {
        let now = Timestamp::now();
        Ok(Self {
            id,
            company_id,
            status: ShareholderStatus::Active,
            name: coerce::text("name", &draft.name)?,
            share_class: coerce::text("share_class", &draft.share_class)?,
            shares_held: coerce::positive_int("shares_held", &draft.shares_held)?,
            acquired_date: coerce::date("acquired_date", &draft.acquired_date)?,
            cessation_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&mut self, draft: Self::Draft) -> Result<(), RegisterError> {
        self.name = coerce::text("name", &draft.name)?;
        self.share_class = coerce::text("share_class", &draft.share_class)?;
        self.shares_held = coerce::positive_int("shares_held", &draft.shares_held)?;
        self.acquired_date = coerce::date("acquired_date", &draft.acquired_date)?;
        Ok(())
    }

    fn apply(&mut self, transition: Self::Transition) -> Result<TransitionOutcome, RegisterError> {
        match transition {
            ShareholderTransition::Ceased { cessation_date } => match self.status {
                ShareholderStatus::Ceased => Ok(TransitionOutcome::Unchanged),
                ShareholderStatus::Active => {
                    // Status and date move together, one write.
                    let date = coerce::date("cessation_date", &cessation_date)?;
                    self.status = ShareholderStatus::Ceased;
                    self.cessation_date = Some(date);
                    Ok(TransitionOutcome::Applied {
                        description: format!("member {} ceased", self.name),
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
            "member {} holding {} {} shares",
            self.name, self.shares_held, self.share_class
        )
    }
}
