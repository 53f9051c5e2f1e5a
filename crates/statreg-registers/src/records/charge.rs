//! # Register of Charges
//!
//! Charges and mortgages over company property. A charge is satisfied
//! when the secured amount is repaid, and released when the lender's
//! claim over the property is discharged. Satisfaction may be skipped
//! when a release is filed directly.
//!
//! ```text
//! Active ──▶ Satisfied ──▶ Released (terminal)
//!    │                        ▲
//!    └────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use statreg_core::{coerce, CompanyId, RecordId, RegisterKind, Timestamp};

use crate::error::RegisterError;
use crate::register::{Register, TransitionOutcome};

/// Lifecycle of a charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeStatus {
    /// Outstanding.
    Active,
    /// Secured amount repaid.
    Satisfied,
    /// Claim discharged (terminal).
    Released,
}

impl std::fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Satisfied => f.write_str("Satisfied"),
            Self::Released => f.write_str("Released"),
        }
    }
}

/// A charge record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Charge {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Lifecycle status.
    pub status: ChargeStatus,
    /// Charge code, unique per company (e.g. "CH-0001").
    pub charge_code: String,
    /// Who holds the charge.
    pub chargee: String,
    /// Description of the secured property.
    pub description: String,
    /// Amount secured.
    pub amount_secured: f64,
    /// Currency of the secured amount.
    pub currency: String,
    /// Date the charge was created.
    pub charge_date: Timestamp,
    /// Date of satisfaction, once satisfied.
    pub satisfaction_date: Option<Timestamp>,
    /// Date of release, once released.
    pub release_date: Option<Timestamp>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last written.
    pub updated_at: Timestamp,
}

/// Wire draft for a charge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeDraft {
    /// Charge code, unique per company.
    pub charge_code: String,
    /// Who holds the charge.
    pub chargee: String,
    /// Description of the secured property.
    pub description: String,
    /// Amount secured, as a decimal string.
    pub amount_secured: String,
    /// Currency code.
    pub currency: String,
    /// Charge date, `YYYY-MM-DD` or RFC 3339.
    pub charge_date: String,
}

/// Status-transition request for a charge.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status")]
pub enum ChargeTransition {
    /// The secured amount was repaid on the given date.
    Satisfied {
        /// Date of satisfaction, `YYYY-MM-DD` or RFC 3339.
        satisfaction_date: String,
    },
    /// The claim was discharged on the given date.
    Released {
        /// Date of release, `YYYY-MM-DD` or RFC 3339.
        release_date: String,
    },
}

impl Register for Charge {
    const KIND: RegisterKind = RegisterKind::Charge;

    type Draft = ChargeDraft;
    type Transition = ChargeTransition;

    fn create(
        id: RecordId,
        company_id: CompanyId,
        draft: Self::Draft,
    ) -> Result<Self, RegisterError> {
        let now = Timestamp::now();
        Ok(Self {
            id,
            company_id,
            status: ChargeStatus::Active,
            charge_code: coerce::text("charge_code", &draft.charge_code)?,
            chargee: coerce::text("chargee", &draft.chargee)?,
            description: coerce::text("description", &draft.description)?,
            amount_secured: coerce::number("amount_secured", &draft.amount_secured)?,
            currency: coerce::text("currency", &draft.currency)?,
            charge_date: coerce::date("charge_date", &draft.charge_date)?,
            satisfaction_date: None,
            release_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&mut self, draft: Self::Draft) -> Result<(), RegisterError> {
        self.charge_code = coerce::text("charge_code", &draft.charge_code)?;
        self.chargee = coerce::text("chargee", &draft.chargee)?;
        self.description = coerce::text("description", &draft.description)?;
        self.amount_secured = coerce::number("amount_secured", &draft.amount_secured)?;
        self.currency = coerce::text("currency", &draft.currency)?;
        self.charge_date = coerce::date("charge_date", &draft.charge_date)?;
        Ok(())
    }

    fn apply(&mut self, transition: Self::Transition) -> Result<TransitionOutcome, RegisterError> {
        match transition {
            ChargeTransition::Satisfied { satisfaction_date } => match self.status {
                // Satisfying an already-satisfied charge re-confirms the
                // state; the recorded satisfaction_date must not move.
                ChargeStatus::Satisfied => Ok(TransitionOutcome::Unchanged),
                ChargeStatus::Released => Err(RegisterError::InvalidTransition {
                    kind: Self::KIND,
                    from: self.status.to_string(),
                    to: ChargeStatus::Satisfied.to_string(),
                }),
                ChargeStatus::Active => {
                    let date = coerce::date("satisfaction_date", &satisfaction_date)?;
                    self.status = ChargeStatus::Satisfied;
                    self.satisfaction_date = Some(date);
                    Ok(TransitionOutcome::Applied {
                        description: format!("charge {} satisfied", self.charge_code),
                    })
                }
            },
            ChargeTransition::Released { release_date } => match self.status {
                ChargeStatus::Released => Ok(TransitionOutcome::Unchanged),
                ChargeStatus::Active | ChargeStatus::Satisfied => {
                    let date = coerce::date("release_date", &release_date)?;
                    self.status = ChargeStatus::Released;
                    self.release_date = Some(date);
                    Ok(TransitionOutcome::Applied {
                        description: format!("charge {} released", self.charge_code),
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
        Some(self.charge_code.clone())
    }

    fn describe(&self) -> String {
        format!(
            "charge {} in favour of {} securing {} {}",
            self.charge_code, self.chargee, self.amount_secured, self.currency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ChargeDraft {
        ChargeDraft {
            charge_code: "CH-0001".into(),
            chargee: "First Bank".into(),
            description: "Fixed charge over premises".into(),
            amount_secured: "250000.00".into(),
            currency: "GBP".into(),
            charge_date: "2024-03-01".into(),
        }
    }

    fn charge() -> Charge {
        Charge::create(RecordId::new(), CompanyId::new(), draft()).unwrap()
    }

    #[test]
    fn test_create_defaults_active() {
        let c = charge();
        assert_eq!(c.status, ChargeStatus::Active);
        assert_eq!(c.amount_secured, 250000.0);
        assert_eq!(c.satisfaction_date, None);
        assert_eq!(c.release_date, None);
    }

    #[test]
    fn test_satisfy_sets_status_and_date_together() {
        let mut c = charge();
        let outcome = c
            .apply(ChargeTransition::Satisfied {
                satisfaction_date: "2025-01-10".into(),
            })
            .unwrap();
        assert!(outcome.changed());
        assert_eq!(c.status, ChargeStatus::Satisfied);
        assert_eq!(
            c.satisfaction_date.unwrap().to_iso8601(),
            "2025-01-10T00:00:00Z"
        );
    }

    #[test]
    fn test_satisfy_twice_does_not_corrupt_satisfaction_date() {
        let mut c = charge();
        c.apply(ChargeTransition::Satisfied {
            satisfaction_date: "2025-01-10".into(),
        })
        .unwrap();
        let again = c
            .apply(ChargeTransition::Satisfied {
                satisfaction_date: "2025-09-09".into(),
            })
            .unwrap();
        assert_eq!(again, TransitionOutcome::Unchanged);
        assert_eq!(
            c.satisfaction_date.unwrap().to_iso8601(),
            "2025-01-10T00:00:00Z"
        );
    }

    #[test]
    fn test_release_from_active_and_from_satisfied() {
        let mut direct = charge();
        direct
            .apply(ChargeTransition::Released {
                release_date: "2025-02-01".into(),
            })
            .unwrap();
        assert_eq!(direct.status, ChargeStatus::Released);

        let mut via_satisfied = charge();
        via_satisfied
            .apply(ChargeTransition::Satisfied {
                satisfaction_date: "2025-01-10".into(),
            })
            .unwrap();
        via_satisfied
            .apply(ChargeTransition::Released {
                release_date: "2025-02-01".into(),
            })
            .unwrap();
        assert_eq!(via_satisfied.status, ChargeStatus::Released);
        assert!(via_satisfied.satisfaction_date.is_some());
    }

    #[test]
    fn test_cannot_satisfy_released_charge() {
        let mut c = charge();
        c.apply(ChargeTransition::Released {
            release_date: "2025-02-01".into(),
        })
        .unwrap();
        let err = c
            .apply(ChargeTransition::Satisfied {
                satisfaction_date: "2025-03-01".into(),
            })
            .unwrap_err();
        assert!(matches!(err, RegisterError::InvalidTransition { .. }));
    }

    #[test]
    fn test_charge_code_is_the_unique_key() {
        assert_eq!(charge().unique_key().as_deref(), Some("CH-0001"));
    }
}
