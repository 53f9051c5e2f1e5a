//! # Register of Directors

use serde::{Deserialize, Serialize};

use statreg_core::{coerce, CompanyId, RecordId, RegisterKind, Timestamp};

use crate::error::RegisterError;
use crate::register::{Register, TransitionOutcome};

/// Lifecycle of a directorship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectorStatus {
    /// Currently appointed.
    Active,
    /// Resigned; retained for history.
    Resigned,
}

impl std::fmt::Display for DirectorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Resigned => f.write_str("Resigned"),
        }
    }
}

/// A director record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Director {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Lifecycle status.
    pub status: DirectorStatus,
    /// Director name.
    pub name: String,
    /// Nationality, as filed.
    pub nationality: String,
    /// Occupation, as filed.
    pub occupation: Option<String>,
    /// Date of appointment.
    pub appointment_date: Timestamp,
    /// Date of resignation, once resigned.
    pub resignation_date: Option<Timestamp>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last written.
    pub updated_at: Timestamp,
}

/// Wire draft for a director.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorDraft {
    /// Director name.
    pub name: String,
    /// Nationality.
    pub nationality: String,
    /// Occupation (optional).
    pub occupation: Option<String>,
    /// Appointment date, `YYYY-MM-DD` or RFC 3339.
    pub appointment_date: String,
}

/// Status-transition request for a director.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status")]
pub enum DirectorTransition {
    /// The director resigned on the given date.
    Resigned {
        /// Date of resignation, `YYYY-MM-DD` or RFC 3339.
        resignation_date: String,
    },
}

impl Register for Director {
    const KIND: RegisterKind = RegisterKind::Director;

    type Draft = DirectorDraft;
    type Transition = DirectorTransition;

    fn create(
        id: RecordId,
        company_id: CompanyId,
        draft: Self::Draft,
    ) -> Result<Self, RegisterError> {
        let now = Timestamp::now();
        Ok(Self {
            id,
            company_id,
            status: DirectorStatus::Active,
            name: coerce::text("name", &draft.name)?,
            nationality: coerce::text("nationality", &draft.nationality)?,
            occupation: draft
                .occupation
                .as_deref()
                .filter(|o| !o.trim().is_empty())
                .map(|o| o.trim().to_string()),
            appointment_date: coerce::date("appointment_date", &draft.appointment_date)?,
            resignation_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&mut self, draft: Self::Draft) -> Result<(), RegisterError> {
        self.name = coerce::text("name", &draft.name)?;
        self.nationality = coerce::text("nationality", &draft.nationality)?;
        self.occupation = draft
            .occupation
            .as_deref()
            .filter(|o| !o.trim().is_empty())
            .map(|o| o.trim().to_string());
        self.appointment_date = coerce::date("appointment_date", &draft.appointment_date)?;
        Ok(())
    }

    fn apply(&mut self, transition: Self::Transition) -> Result<TransitionOutcome, RegisterError> {
        match transition {
            DirectorTransition::Resigned { resignation_date } => match self.status {
                DirectorStatus::Resigned => Ok(TransitionOutcome::Unchanged),
                DirectorStatus::Active => {
                    let date = coerce::date("resignation_date", &resignation_date)?;
                    self.status = DirectorStatus::Resigned;
                    self.resignation_date = Some(date);
                    Ok(TransitionOutcome::Applied {
                        description: format!("director {} resigned", self.name),
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
        format!("director {}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> DirectorDraft {
        DirectorDraft {
            name: "Margaret Hamilton".into(),
            nationality: "American".into(),
            occupation: Some("Engineer".into()),
            appointment_date: "2024-01-15".into(),
        }
    }

    #[test]
    fn test_create_defaults() {
        let d = Director::create(RecordId::new(), CompanyId::new(), draft()).unwrap();
        assert_eq!(d.status, DirectorStatus::Active);
        assert_eq!(d.occupation.as_deref(), Some("Engineer"));
        assert_eq!(d.resignation_date, None);
    }

    #[test]
    fn test_empty_occupation_is_none() {
        let mut raw = draft();
        raw.occupation = Some("   ".into());
        let d = Director::create(RecordId::new(), CompanyId::new(), raw).unwrap();
        assert_eq!(d.occupation, None);
    }

    #[test]
    fn test_resign_sets_status_and_date_atomically() {
        let mut d = Director::create(RecordId::new(), CompanyId::new(), draft()).unwrap();
        let outcome = d
            .apply(DirectorTransition::Resigned {
                resignation_date: "2025-02-01".into(),
            })
            .unwrap();
        assert!(outcome.changed());
        assert_eq!(d.status, DirectorStatus::Resigned);
        assert!(d.resignation_date.is_some());
    }

    #[test]
    fn test_resign_twice_keeps_original_date() {
        let mut d = Director::create(RecordId::new(), CompanyId::new(), draft()).unwrap();
        d.apply(DirectorTransition::Resigned {
            resignation_date: "2025-02-01".into(),
        })
        .unwrap();
        let again = d
            .apply(DirectorTransition::Resigned {
                resignation_date: "2025-05-01".into(),
            })
            .unwrap();
        assert_eq!(again, TransitionOutcome::Unchanged);
        assert_eq!(
            d.resignation_date.unwrap().to_iso8601(),
            "2025-02-01T00:00:00Z"
        );
    }
}
