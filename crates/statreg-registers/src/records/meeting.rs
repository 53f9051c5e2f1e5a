//! # General Meetings
//!
//! Meetings and the resolutions put to them. A meeting owns its
//! resolutions: they live inside the meeting record and commit in the
//! same write, so a resolution can never be persisted without its
//! meeting.

use serde::{Deserialize, Serialize};

use statreg_core::{coerce, CompanyId, RecordId, RegisterKind, Timestamp};

use crate::error::RegisterError;
use crate::register::{Register, TransitionOutcome};

/// Lifecycle of a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeetingStatus {
    /// Convened but not yet held.
    Scheduled,
    /// Took place.
    Held,
    /// Called off.
    Cancelled,
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => f.write_str("Scheduled"),
            Self::Held => f.write_str("Held"),
            Self::Cancelled => f.write_str("Cancelled"),
        }
    }
}

/// A resolution put to a meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resolution {
    /// Resolution title.
    pub title: String,
    /// Whether the resolution passed.
    pub passed: bool,
}

/// Wire draft of a resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionDraft {
    /// Resolution title.
    pub title: String,
    /// Passed flag, as a boolean string.
    pub passed: String,
}

/// A meeting record, owning its resolutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Lifecycle status.
    pub status: MeetingStatus,
    /// Meeting title, e.g. "Annual General Meeting 2025".
    pub title: String,
    /// Scheduled date of the meeting.
    pub meeting_date: Timestamp,
    /// Where the meeting convenes.
    pub location: Option<String>,
    /// Resolutions put to the meeting, committed with it.
    pub resolutions: Vec<Resolution>,
    /// Date the meeting was actually held, once held.
    pub held_date: Option<Timestamp>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last written.
    pub updated_at: Timestamp,
}

/// Wire draft for a meeting and its resolutions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingDraft {
    /// Meeting title.
    pub title: String,
    /// Meeting date, `YYYY-MM-DD` or RFC 3339.
    pub meeting_date: String,
    /// Location (optional).
    pub location: Option<String>,
    /// Resolutions (optional, defaults empty).
    #[serde(default)]
    pub resolutions: Vec<ResolutionDraft>,
}

/// Status-transition request for a meeting.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status")]
pub enum MeetingTransition {
    /// The meeting was held on the given date.
    Held {
        /// Date held, `YYYY-MM-DD` or RFC 3339.
        held_date: String,
    },
    /// The meeting was called off.
    Cancelled,
}

fn coerce_resolutions(drafts: &[ResolutionDraft]) -> Result<Vec<Resolution>, RegisterError> {
    drafts
        .iter()
        .enumerate()
        .map(|(i, draft)| {
            Ok(Resolution {
                title: coerce::text(&format!("resolutions[{i}].title"), &draft.title)?,
                passed: coerce::boolean(&format!("resolutions[{i}].passed"), &draft.passed)?,
            })
        })
        .collect()
}

impl Register for Meeting {
    const KIND: RegisterKind = RegisterKind::Meeting;
    const SUPPORTS_DELETE: bool = true;

    type Draft = MeetingDraft;
    type Transition = MeetingTransition;

    fn create(
        id: RecordId,
        company_id: CompanyId,
        draft: Self::Draft,
    ) -> Result<Self, RegisterError> {
        let now = Timestamp::now();
        Ok(Self {
            id,
            company_id,
            status: MeetingStatus::Scheduled,
            title: coerce::text("title", &draft.title)?,
            meeting_date: coerce::date("meeting_date", &draft.meeting_date)?,
            location: draft
                .location
                .as_deref()
                .filter(|l| !l.trim().is_empty())
                .map(|l| l.trim().to_string()),
            resolutions: coerce_resolutions(&draft.resolutions)?,
            held_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&mut self, draft: Self::Draft) -> Result<(), RegisterError> {
        // Coerce everything before touching the record, so a bad
        // resolution row cannot leave a half-updated aggregate.
        let title = coerce::text("title", &draft.title)?;
        let meeting_date = coerce::date("meeting_date", &draft.meeting_date)?;
        let resolutions = coerce_resolutions(&draft.resolutions)?;
        self.title = title;
        self.meeting_date = meeting_date;
        self.location = draft
            .location
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .map(|l| l.trim().to_string());
        self.resolutions = resolutions;
        Ok(())
    }

    fn apply(&mut self, transition: Self::Transition) -> Result<TransitionOutcome, RegisterError> {
        match transition {
            MeetingTransition::Held { held_date } => match self.status {
                MeetingStatus::Held => Ok(TransitionOutcome::Unchanged),
                MeetingStatus::Cancelled => Err(RegisterError::InvalidTransition {
                    kind: Self::KIND,
                    from: self.status.to_string(),
                    to: MeetingStatus::Held.to_string(),
                }),
                MeetingStatus::Scheduled => {
                    let date = coerce::date("held_date", &held_date)?;
                    self.status = MeetingStatus::Held;
                    self.held_date = Some(date);
                    Ok(TransitionOutcome::Applied {
                        description: format!("meeting '{}' held", self.title),
                    })
                }
            },
            MeetingTransition::Cancelled => match self.status {
                MeetingStatus::Cancelled => Ok(TransitionOutcome::Unchanged),
                MeetingStatus::Held => Err(RegisterError::InvalidTransition {
                    kind: Self::KIND,
                    from: self.status.to_string(),
                    to: MeetingStatus::Cancelled.to_string(),
                }),
                MeetingStatus::Scheduled => {
                    self.status = MeetingStatus::Cancelled;
                    Ok(TransitionOutcome::Applied {
                        description: format!("meeting '{}' cancelled", self.title),
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
            "meeting '{}' with {} resolution(s)",
            self.title,
            self.resolutions.len()
        )
    }

    fn deletable(&self) -> Result<(), RegisterError> {
        match self.status {
            MeetingStatus::Scheduled => Ok(()),
            _ => Err(RegisterError::Conflict(format!(
                "meeting '{}' is {} and can no longer be deleted",
                self.title, self.status
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> MeetingDraft {
        MeetingDraft {
            title: "Annual General Meeting 2025".into(),
            meeting_date: "2025-05-01".into(),
            location: Some("Registered office".into()),
            resolutions: vec![
                ResolutionDraft {
                    title: "Approve accounts".into(),
                    passed: "true".into(),
                },
                ResolutionDraft {
                    title: "Re-appoint auditors".into(),
                    passed: "false".into(),
                },
            ],
        }
    }

    #[test]
    fn test_create_owns_coerced_resolutions() {
        let m = Meeting::create(RecordId::new(), CompanyId::new(), draft()).unwrap();
        assert_eq!(m.status, MeetingStatus::Scheduled);
        assert_eq!(m.resolutions.len(), 2);
        assert!(m.resolutions[0].passed);
        assert!(!m.resolutions[1].passed);
    }

    #[test]
    fn test_bad_resolution_row_fails_whole_create() {
        let mut d = draft();
        d.resolutions[1].passed = "perhaps".into();
        let err = Meeting::create(RecordId::new(), CompanyId::new(), d).unwrap_err();
        assert!(err.to_string().contains("resolutions[1].passed"));
    }

    #[test]
    fn test_bad_resolution_row_leaves_update_untouched() {
        let mut m = Meeting::create(RecordId::new(), CompanyId::new(), draft()).unwrap();
        let mut d = draft();
        d.title = "Renamed".into();
        d.resolutions[0].passed = "perhaps".into();
        assert!(m.update(d).is_err());
        assert_eq!(m.title, "Annual General Meeting 2025");
        assert_eq!(m.resolutions.len(), 2);
    }

    #[test]
    fn test_held_then_cancel_is_invalid() {
        let mut m = Meeting::create(RecordId::new(), CompanyId::new(), draft()).unwrap();
        m.apply(MeetingTransition::Held {
            held_date: "2025-05-01".into(),
        })
        .unwrap();
        let err = m.apply(MeetingTransition::Cancelled).unwrap_err();
        assert!(matches!(err, RegisterError::InvalidTransition { .. }));
    }

    #[test]
    fn test_only_scheduled_meetings_are_deletable() {
        let mut m = Meeting::create(RecordId::new(), CompanyId::new(), draft()).unwrap();
        assert!(m.deletable().is_ok());
        m.apply(MeetingTransition::Held {
            held_date: "2025-05-01".into(),
        })
        .unwrap();
        assert!(m.deletable().is_err());
    }
}
