//! # Register of Allotments
//!
//! Shares allotted by a company: how many, of which class, to whom, at
//! what price. An allotment is never edited out of existence — a mistaken
//! filing is cancelled, which keeps the register's history intact.

use serde::{Deserialize, Serialize};

use statreg_core::{coerce, CompanyId, RecordId, RegisterKind, Timestamp};

use crate::error::RegisterError;
use crate::register::{Register, TransitionOutcome};

/// Lifecycle of an allotment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllotmentStatus {
    /// On the register.
    Active,
    /// Cancelled; retained for history.
    Cancelled,
}

impl std::fmt::Display for AllotmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Cancelled => f.write_str("Cancelled"),
        }
    }
}

/// A share allotment record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allotment {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Lifecycle status.
    pub status: AllotmentStatus,
    /// Person or body the shares were allotted to.
    pub allottee: String,
    /// Share class code, e.g. "Ordinary".
    pub share_class: String,
    /// Number of shares allotted.
    pub number_of_shares: i64,
    /// Price paid per share.
    pub price_per_share: f64,
    /// ISO currency code of the price.
    pub currency: String,
    /// Date of the allotment.
    pub allotment_date: Timestamp,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last written.
    pub updated_at: Timestamp,
}

/// Wire draft for creating or updating an allotment. Scalars arrive as
/// strings and are coerced exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllotmentDraft {
    /// Person or body the shares are allotted to.
    pub allottee: String,
    /// Share class code.
    pub share_class: String,
    /// Number of shares, as a decimal integer string.
    pub number_of_shares: String,
    /// Price per share, as a decimal string.
    pub price_per_share: String,
    /// ISO currency code.
    pub currency: String,
    /// Allotment date, `YYYY-MM-DD` or RFC 3339.
    pub allotment_date: String,
}

/// Status-transition request for an allotment.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status")]
pub enum AllotmentTransition {
    /// Cancel the allotment.
    Cancelled,
}

impl Allotment {
    fn coerce(draft: &AllotmentDraft) -> Result<CoercedAllotment, RegisterError> {
        Ok(CoercedAllotment {
            allottee: coerce::text("allottee", &draft.allottee)?,
            share_class: coerce::text("share_class", &draft.share_class)?,
            number_of_shares: coerce::positive_int("number_of_shares", &draft.number_of_shares)?,
            price_per_share: coerce::number("price_per_share", &draft.price_per_share)?,
            currency: coerce::text("currency", &draft.currency)?,
            allotment_date: coerce::date("allotment_date", &draft.allotment_date)?,
        })
    }
}

struct CoercedAllotment {
    allottee: String,
    share_class: String,
    number_of_shares: i64,
    price_per_share: f64,
    currency: String,
    allotment_date: Timestamp,
}

impl Register for Allotment {
    const KIND: RegisterKind = RegisterKind::Allotment;

    type Draft = AllotmentDraft;
    type Transition = AllotmentTransition;

    fn create(
        id: RecordId,
        company_id: CompanyId,
        draft: Self::Draft,
    ) -> Result<Self, RegisterError> {
        let coerced = Self::coerce(&draft)?;
        let now = Timestamp::now();
        Ok(Self {
            id,
            company_id,
            status: AllotmentStatus::Active,
            allottee: coerced.allottee,
            share_class: coerced.share_class,
            number_of_shares: coerced.number_of_shares,
            price_per_share: coerced.price_per_share,
            currency: coerced.currency,
            allotment_date: coerced.allotment_date,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&mut self, draft: Self::Draft) -> Result<(), RegisterError> {
        let coerced = Self::coerce(&draft)?;
        self.allottee = coerced.allottee;
        self.share_class = coerced.share_class;
        self.number_of_shares = coerced.number_of_shares;
        self.price_per_share = coerced.price_per_share;
        self.currency = coerced.currency;
        self.allotment_date = coerced.allotment_date;
        Ok(())
    }

    fn apply(&mut self, transition: Self::Transition) -> Result<TransitionOutcome, RegisterError> {
        match transition {
            AllotmentTransition::Cancelled => match self.status {
                AllotmentStatus::Cancelled => Ok(TransitionOutcome::Unchanged),
                AllotmentStatus::Active => {
                    self.status = AllotmentStatus::Cancelled;
                    Ok(TransitionOutcome::Applied {
                        description: format!(
                            "allotment of {} {} shares to {} cancelled",
                            self.number_of_shares, self.share_class, self.allottee
                        ),
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
            "{} {} shares to {}",
            self.number_of_shares, self.share_class, self.allottee
        )
    }
}
