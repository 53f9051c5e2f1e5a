//! # Register Kinds
//!
//! The single enumeration of statutory register kinds. One definition,
//! exhaustive `match` everywhere — adding a register forces every
//! consumer (stores, activity log, routes, import) to handle it.

use serde::{Deserialize, Serialize};

/// The statutory registers a company maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegisterKind {
    /// Share allotments.
    Allotment,
    /// Members (shareholders).
    Shareholder,
    /// Directors and their appointments.
    Director,
    /// Share classes.
    ShareClass,
    /// Persons with significant control.
    BeneficialOwner,
    /// Charges and mortgages.
    Charge,
    /// General meetings and their resolutions.
    Meeting,
    /// Board minutes with discussions and action items.
    BoardMinute,
}

/// Number of register kinds. Exhaustiveness checks compare against this.
pub const REGISTER_KIND_COUNT: usize = 8;

impl RegisterKind {
    /// All register kinds, in declaration order.
    pub const ALL: [RegisterKind; REGISTER_KIND_COUNT] = [
        Self::Allotment,
        Self::Shareholder,
        Self::Director,
        Self::ShareClass,
        Self::BeneficialOwner,
        Self::Charge,
        Self::Meeting,
        Self::BoardMinute,
    ];

    /// The stable snake_case tag stored on activity entries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allotment => "allotment",
            Self::Shareholder => "shareholder",
            Self::Director => "director",
            Self::ShareClass => "share_class",
            Self::BeneficialOwner => "beneficial_owner",
            Self::Charge => "charge",
            Self::Meeting => "meeting",
            Self::BoardMinute => "board_minute",
        }
    }

    /// The URL path segment this register is served under.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Allotment => "allotments",
            Self::Shareholder => "shareholders",
            Self::Director => "directors",
            Self::ShareClass => "share-classes",
            Self::BeneficialOwner => "beneficial-owners",
            Self::Charge => "charges",
            Self::Meeting => "meetings",
            Self::BoardMinute => "board-minutes",
        }
    }

    /// Resolve a URL path segment back to a register kind.
    pub fn from_path_segment(segment: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.path_segment() == segment)
    }
}

impl std::fmt::Display for RegisterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_kind() {
        assert_eq!(RegisterKind::ALL.len(), REGISTER_KIND_COUNT);
    }

    #[test]
    fn test_path_segments_roundtrip() {
        for kind in RegisterKind::ALL {
            assert_eq!(
                RegisterKind::from_path_segment(kind.path_segment()),
                Some(kind)
            );
        }
    }

    #[test]
    fn test_unknown_segment_is_none() {
        assert_eq!(RegisterKind::from_path_segment("invoices"), None);
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&RegisterKind::ShareClass).unwrap();
        assert_eq!(json, "\"share_class\"");
    }
}
