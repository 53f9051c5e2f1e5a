//! # Activity Records
//!
//! One immutable record per successful mutation. The record holds a weak
//! reference to the mutated register record — deleting or archiving the
//! record never touches its history.

use serde::{Deserialize, Serialize};

use statreg_core::{ActivityId, CompanyId, RecordId, RegisterKind, Timestamp};

/// What kind of mutation an activity entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A record was created.
    Added,
    /// A record's fields were updated.
    Updated,
    /// A record was removed.
    Removed,
    /// A record moved through its status machine.
    StatusChanged,
    /// A batch of records was imported.
    Imported,
}

impl ActivityKind {
    /// The stable wire tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Updated => "updated",
            Self::Removed => "removed",
            Self::StatusChanged => "status_changed",
            Self::Imported => "imported",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable audit entry describing one completed mutation.
///
/// Created strictly after its triggering mutation commits; never updated
/// afterwards. Failed mutations leave no record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Unique identifier of this entry.
    pub id: ActivityId,
    /// The company whose register was mutated.
    pub company_id: CompanyId,
    /// What happened.
    pub kind: ActivityKind,
    /// Which register the mutated record belongs to.
    pub register: RegisterKind,
    /// Weak reference to the mutated record. `None` for batch-level
    /// entries (an import summarises many records in one entry).
    pub record_id: Option<RecordId>,
    /// Human-readable description built by the caller from record fields,
    /// e.g. "500 Ordinary shares to Ada Lovelace".
    pub description: String,
    /// Who performed the mutation ("system" for non-interactive actors).
    pub actor: String,
    /// When the entry was appended.
    pub recorded_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags_are_stable() {
        assert_eq!(ActivityKind::Added.as_str(), "added");
        assert_eq!(ActivityKind::StatusChanged.as_str(), "status_changed");
        assert_eq!(ActivityKind::Imported.to_string(), "imported");
    }

    #[test]
    fn test_record_serde_roundtrip() {
        let record = ActivityRecord {
            id: ActivityId::new(),
            company_id: CompanyId::new(),
            kind: ActivityKind::Added,
            register: RegisterKind::Allotment,
            record_id: Some(RecordId::new()),
            description: "500 Ordinary shares to Ada Lovelace".into(),
            actor: "ada".into(),
            recorded_at: Timestamp::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let parsed: ActivityRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, record.id);
        assert_eq!(parsed.kind, record.kind);
        assert_eq!(parsed.description, record.description);
    }
}
