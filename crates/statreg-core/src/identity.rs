//! # Domain Identity Newtypes
//!
//! Newtype wrappers for all domain identifiers in the register stack.
//! These prevent accidental identifier confusion — you cannot pass a
//! `CompanyId` where a `RecordId` is expected.
//!
//! Every statutory record belongs to exactly one company; keeping the two
//! identifier namespaces distinct at the type level means a company-scope
//! check can never silently compare the wrong pair.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a company (the tenancy boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompanyId(pub Uuid);

/// Unique identifier for a statutory register record
/// (allotment, director, charge, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

/// Unique identifier for a user acting on the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

/// Unique identifier for an activity log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActivityId(pub Uuid);

macro_rules! impl_id {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Generate a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Access the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, ":{}"), self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Accept both the bare UUID and the prefixed display form.
                let raw = s.strip_prefix(concat!($prefix, ":")).unwrap_or(s);
                Ok(Self(raw.parse()?))
            }
        }
    };
}

impl_id!(CompanyId, "company");
impl_id!(RecordId, "record");
impl_id!(UserId, "user");
impl_id!(ActivityId, "activity");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(CompanyId::new(), CompanyId::new());
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn test_display_carries_namespace_prefix() {
        let id = CompanyId::new();
        assert!(id.to_string().starts_with("company:"));
        let id = RecordId::new();
        assert!(id.to_string().starts_with("record:"));
    }

    #[test]
    fn test_from_str_accepts_bare_and_prefixed() {
        let id = UserId::new();
        let bare: UserId = id.as_uuid().to_string().parse().unwrap();
        let prefixed: UserId = id.to_string().parse().unwrap();
        assert_eq!(bare, id);
        assert_eq!(prefixed, id);
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = ActivityId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: ActivityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
