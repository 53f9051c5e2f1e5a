//! # Register Record Types
//!
//! One module per statutory register. Each defines the stored record,
//! its wire draft, its status machine, and its [`Register`] strategy
//! implementation.
//!
//! [`Register`]: crate::register::Register

pub mod allotment;
pub mod beneficial_owner;
pub mod board_minute;
pub mod charge;
pub mod director;
pub mod meeting;
pub mod share_class;
pub mod shareholder;

pub use allotment::{Allotment, AllotmentDraft, AllotmentStatus, AllotmentTransition};
pub use beneficial_owner::{
    BeneficialOwner, BeneficialOwnerDraft, BeneficialOwnerStatus, BeneficialOwnerTransition,
};
pub use board_minute::{
    ActionItem, BoardMinute, BoardMinuteDraft, BoardMinuteStatus, BoardMinuteTransition,
    Discussion,
};
pub use charge::{Charge, ChargeDraft, ChargeStatus, ChargeTransition};
pub use director::{Director, DirectorDraft, DirectorStatus, DirectorTransition};
pub use meeting::{Meeting, MeetingDraft, MeetingStatus, MeetingTransition, Resolution};
pub use share_class::{ShareClass, ShareClassDraft, ShareClassStatus, ShareClassTransition};
pub use shareholder::{Shareholder, ShareholderDraft, ShareholderStatus, ShareholderTransition};
