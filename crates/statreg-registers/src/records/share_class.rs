//! # Share Classes
//!
//! The classes of shares a company may issue. Class codes are unique per
//! company, and at most one class carries the default flag — the flip is
//! done under a single store lock (see
//! [`RegisterService::set_default`](crate::service::RegisterService::set_default)).

use serde::{Deserialize, Serialize};

use statreg_core::{coerce, CompanyId, RecordId, RegisterKind, Timestamp};

use crate::error::RegisterError;
use crate::register::{Register, TransitionOutcome};

/// Lifecycle of a share class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShareClassStatus {
    /// Available for issue.
    Active,
    /// Archived; no further issues.
    Archived,
}

impl std::fmt::Display for ShareClassStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Archived => f.write_str("Archived"),
        }
    }
}

/// A share class record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareClass {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Lifecycle status.
    pub status: ShareClassStatus,
    /// Class code, unique per company (e.g. "ORD").
    pub code: String,
    /// Display name (e.g. "Ordinary").
    pub name: String,
    /// Nominal value per share.
    pub nominal_value: f64,
    /// Currency of the nominal value.
    pub currency: String,
    /// Votes carried per share.
    pub votes_per_share: i64,
    /// Whether this is the company's default class for new allotments.
    pub is_default: bool,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last written.
    pub updated_at: Timestamp,
}

/// Wire draft for a share class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareClassDraft {
    /// Class code, unique per company.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Nominal value per share, as a decimal string.
    pub nominal_value: String,
    /// Currency of the nominal value.
    pub currency: String,
    /// Votes per share, as a decimal integer string.
    pub votes_per_share: String,
    /// Default-class flag, as a boolean string (optional, defaults false).
    pub is_default: Option<String>,
}

/// Status-transition request for a share class.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status")]
pub enum ShareClassTransition {
    /// Archive the class.
    Archived,
}

impl Register for ShareClass {
    const KIND: RegisterKind = RegisterKind::ShareClass;

    type Draft = ShareClassDraft;
    type Transition = ShareClassTransition;

    fn create(
        id: RecordId,
        company_id: CompanyId,
        draft: Self::Draft,
    ) -> Result<Self, RegisterError> {
        let now = Timestamp::now();
        let is_default = match draft.is_default.as_deref() {
            None => false,
            Some(raw) if raw.trim().is_empty() => false,
            Some(raw) => coerce::boolean("is_default", raw)?,
        };
        Ok(Self {
            id,
            company_id,
            status: ShareClassStatus::Active,
            code: coerce::text("code", &draft.code)?,
            name: coerce::text("name", &draft.name)?,
            nominal_value: coerce::number("nominal_value", &draft.nominal_value)?,
            currency: coerce::text("currency", &draft.currency)?,
            votes_per_share: coerce::int("votes_per_share", &draft.votes_per_share)?,
            is_default,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&mut self, draft: Self::Draft) -> Result<(), RegisterError> {
        self.code = coerce::text("code", &draft.code)?;
        self.name = coerce::text("name", &draft.name)?;
        self.nominal_value = coerce::number("nominal_value", &draft.nominal_value)?;
        self.currency = coerce::text("currency", &draft.currency)?;
        self.votes_per_share = coerce::int("votes_per_share", &draft.votes_per_share)?;
        // The default flag is not editable through update; it moves only
        // through the set-default operation so the one-default invariant
        // stays under a single lock.
        Ok(())
    }

    fn apply(&mut self, transition: Self::Transition) -> Result<TransitionOutcome, RegisterError> {
        match transition {
            ShareClassTransition::Archived => match self.status {
                ShareClassStatus::Archived => Ok(TransitionOutcome::Unchanged),
                ShareClassStatus::Active => {
                    self.status = ShareClassStatus::Archived;
                    self.is_default = false;
                    Ok(TransitionOutcome::Applied {
                        description: format!("share class {} archived", self.code),
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

    fn unique_key(&self) -> Option<String> {
        Some(self.code.clone())
    }

    fn describe(&self) -> String {
        format!("share class {} ({})", self.code, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(code: &str) -> ShareClassDraft {
        ShareClassDraft {
            code: code.into(),
            name: "Ordinary".into(),
            nominal_value: "0.01".into(),
            currency: "GBP".into(),
            votes_per_share: "1".into(),
            is_default: None,
        }
    }

    #[test]
    fn test_create_coerces_and_defaults() {
        let sc = ShareClass::create(RecordId::new(), CompanyId::new(), draft("ORD")).unwrap();
        assert_eq!(sc.nominal_value, 0.01);
        assert_eq!(sc.votes_per_share, 1);
        assert!(!sc.is_default);
        assert_eq!(sc.status, ShareClassStatus::Active);
    }

    #[test]
    fn test_default_flag_coerces_from_string() {
        let mut d = draft("ORD");
        d.is_default = Some("true".into());
        let sc = ShareClass::create(RecordId::new(), CompanyId::new(), d).unwrap();
        assert!(sc.is_default);

        let mut d = draft("ORD");
        d.is_default = Some("maybe".into());
        assert!(ShareClass::create(RecordId::new(), CompanyId::new(), d).is_err());
    }

    #[test]
    fn test_unique_key_is_the_code() {
        let sc = ShareClass::create(RecordId::new(), CompanyId::new(), draft("PREF")).unwrap();
        assert_eq!(sc.unique_key().as_deref(), Some("PREF"));
    }

    #[test]
    fn test_archiving_clears_default_flag() {
        let mut d = draft("ORD");
        d.is_default = Some("yes".into());
        let mut sc = ShareClass::create(RecordId::new(), CompanyId::new(), d).unwrap();
        let outcome = sc.apply(ShareClassTransition::Archived).unwrap();
        assert!(outcome.changed());
        assert!(!sc.is_default);

        let again = sc.apply(ShareClassTransition::Archived).unwrap();
        assert_eq!(again, TransitionOutcome::Unchanged);
    }

    #[test]
    fn test_update_does_not_touch_default_flag() {
        let mut d = draft("ORD");
        d.is_default = Some("true".into());
        let mut sc = ShareClass::create(RecordId::new(), CompanyId::new(), d).unwrap();
        let mut newer = draft("ORD");
        newer.is_default = Some("false".into());
        sc.update(newer).unwrap();
        assert!(sc.is_default);
    }
}
