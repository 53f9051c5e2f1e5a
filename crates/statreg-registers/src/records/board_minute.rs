//! # Board Minutes
//!
//! Minutes of board meetings with their discussions and action items.
//! The minute owns both child lists — they are coerced up front and
//! committed with the minute in one write.

use serde::{Deserialize, Serialize};

use statreg_core::{coerce, CompanyId, RecordId, RegisterKind, Timestamp};

use crate::error::RegisterError;
use crate::register::{Register, TransitionOutcome};

/// Lifecycle of a board minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardMinuteStatus {
    /// Being drafted; editable and deletable.
    Draft,
    /// Signed off; immutable record of the meeting.
    Finalised,
}

impl std::fmt::Display for BoardMinuteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => f.write_str("Draft"),
            Self::Finalised => f.write_str("Finalised"),
        }
    }
}

/// A discussion topic recorded in the minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
    /// Topic discussed.
    pub topic: String,
    /// Summary of the discussion.
    pub summary: String,
}

/// An action item arising from the meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItem {
    /// What is to be done.
    pub description: String,
    /// Who owns the action.
    pub owner: String,
    /// When it is due, if a date was set.
    pub due_date: Option<Timestamp>,
}

/// Wire draft of a discussion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionDraft {
    /// Topic discussed.
    pub topic: String,
    /// Summary of the discussion.
    pub summary: String,
}

/// Wire draft of an action item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionItemDraft {
    /// What is to be done.
    pub description: String,
    /// Who owns the action.
    pub owner: String,
    /// Due date, `YYYY-MM-DD` or RFC 3339 (optional).
    pub due_date: Option<String>,
}

/// A board minute record, owning its discussions and action items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardMinute {
    /// Unique record identifier.
    pub id: RecordId,
    /// Owning company.
    pub company_id: CompanyId,
    /// Lifecycle status.
    pub status: BoardMinuteStatus,
    /// Minute title, e.g. "Board meeting, March 2025".
    pub title: String,
    /// Date of the board meeting.
    pub minute_date: Timestamp,
    /// Discussions, committed with the minute.
    pub discussions: Vec<Discussion>,
    /// Action items, committed with the minute.
    pub action_items: Vec<ActionItem>,
    /// Date the minute was finalised, once finalised.
    pub finalised_date: Option<Timestamp>,
    /// When the record was created.
    pub created_at: Timestamp,
    /// When the record was last written.
    pub updated_at: Timestamp,
}

/// Wire draft for a board minute and its children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardMinuteDraft {
    /// Minute title.
    pub title: String,
    /// Meeting date, `YYYY-MM-DD` or RFC 3339.
    pub minute_date: String,
    /// Discussions (optional, defaults empty).
    #[serde(default)]
    pub discussions: Vec<DiscussionDraft>,
    /// Action items (optional, defaults empty).
    #[serde(default)]
    pub action_items: Vec<ActionItemDraft>,
}

/// Status-transition request for a board minute.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "status")]
pub enum BoardMinuteTransition {
    /// Sign the minute off on the given date.
    Finalised {
        /// Date of sign-off, `YYYY-MM-DD` or RFC 3339.
        finalised_date: String,
    },
}

fn coerce_children(
    draft: &BoardMinuteDraft,
) -> Result<(Vec<Discussion>, Vec<ActionItem>), RegisterError> {
    let discussions = draft
        .discussions
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Ok(Discussion {
                topic: coerce::text(&format!("discussions[{i}].topic"), &d.topic)?,
                summary: coerce::text(&format!("discussions[{i}].summary"), &d.summary)?,
            })
        })
        .collect::<Result<Vec<_>, RegisterError>>()?;

    let action_items = draft
        .action_items
        .iter()
        .enumerate()
        .map(|(i, a)| {
            Ok(ActionItem {
                description: coerce::text(&format!("action_items[{i}].description"), &a.description)?,
                owner: coerce::text(&format!("action_items[{i}].owner"), &a.owner)?,
                due_date: coerce::date_opt(
                    &format!("action_items[{i}].due_date"),
                    a.due_date.as_deref(),
                )?,
            })
        })
        .collect::<Result<Vec<_>, RegisterError>>()?;

    Ok((discussions, action_items))
}

impl Register for BoardMinute {
    const KIND: RegisterKind = RegisterKind::BoardMinute;
    const SUPPORTS_DELETE: bool = true;

    type Draft = BoardMinuteDraft;
    type Transition = BoardMinuteTransition;

    fn create(
        id: RecordId,
        company_id: CompanyId,
        draft: Self::Draft,
    ) -> Result<Self, RegisterError> {
        let (discussions, action_items) = coerce_children(&draft)?;
        let now = Timestamp::now();
        Ok(Self {
            id,
            company_id,
            status: BoardMinuteStatus::Draft,
            title: coerce::text("title", &draft.title)?,
            minute_date: coerce::date("minute_date", &draft.minute_date)?,
            discussions,
            action_items,
            finalised_date: None,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&mut self, draft: Self::Draft) -> Result<(), RegisterError> {
        if self.status == BoardMinuteStatus::Finalised {
            return Err(RegisterError::Conflict(format!(
                "minute '{}' is finalised and can no longer be edited",
                self.title
            )));
        }
        let (discussions, action_items) = coerce_children(&draft)?;
        self.title = coerce::text("title", &draft.title)?;
        self.minute_date = coerce::date("minute_date", &draft.minute_date)?;
        self.discussions = discussions;
        self.action_items = action_items;
        Ok(())
    }

    fn apply(&mut self, transition: Self::Transition) -> Result<TransitionOutcome, RegisterError> {
        match transition {
            BoardMinuteTransition::Finalised { finalised_date } => match self.status {
                BoardMinuteStatus::Finalised => Ok(TransitionOutcome::Unchanged),
                BoardMinuteStatus::Draft => {
                    let date = coerce::date("finalised_date", &finalised_date)?;
                    self.status = BoardMinuteStatus::Finalised;
                    self.finalised_date = Some(date);
                    Ok(TransitionOutcome::Applied {
                        description: format!("minute '{}' finalised", self.title),
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
            "minute '{}' ({} discussion(s), {} action item(s))",
            self.title,
            self.discussions.len(),
            self.action_items.len()
        )
    }

    fn deletable(&self) -> Result<(), RegisterError> {
        match self.status {
            BoardMinuteStatus::Draft => Ok(()),
            BoardMinuteStatus::Finalised => Err(RegisterError::Conflict(format!(
                "minute '{}' is finalised and cannot be deleted",
                self.title
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BoardMinuteDraft {
        BoardMinuteDraft {
            title: "Board meeting, March 2025".into(),
            minute_date: "2025-03-10".into(),
            discussions: vec![DiscussionDraft {
                topic: "Quarterly results".into(),
                summary: "Reviewed and noted.".into(),
            }],
            action_items: vec![ActionItemDraft {
                description: "Circulate revised budget".into(),
                owner: "Finance".into(),
                due_date: Some("2025-03-31".into()),
            }],
        }
    }

    #[test]
    fn test_create_commits_children_with_parent() {
        let m = BoardMinute::create(RecordId::new(), CompanyId::new(), draft()).unwrap();
        assert_eq!(m.status, BoardMinuteStatus::Draft);
        assert_eq!(m.discussions.len(), 1);
        assert_eq!(m.action_items.len(), 1);
        assert_eq!(
            m.action_items[0].due_date.unwrap().to_iso8601(),
            "2025-03-31T00:00:00Z"
        );
    }

    #[test]
    fn test_bad_child_fails_the_whole_create() {
        let mut d = draft();
        d.action_items[0].due_date = Some("whenever".into());
        let err = BoardMinute::create(RecordId::new(), CompanyId::new(), d).unwrap_err();
        assert!(err.to_string().contains("action_items[0].due_date"));
    }

    #[test]
    fn test_missing_due_date_is_none() {
        let mut d = draft();
        d.action_items[0].due_date = None;
        let m = BoardMinute::create(RecordId::new(), CompanyId::new(), d).unwrap();
        assert_eq!(m.action_items[0].due_date, None);
    }

    #[test]
    fn test_finalised_minutes_are_immutable() {
        let mut m = BoardMinute::create(RecordId::new(), CompanyId::new(), draft()).unwrap();
        m.apply(BoardMinuteTransition::Finalised {
            finalised_date: "2025-03-12".into(),
        })
        .unwrap();
        assert!(m.update(draft()).is_err());
        assert!(m.deletable().is_err());
    }

    #[test]
    fn test_finalise_twice_is_unchanged() {
        let mut m = BoardMinute::create(RecordId::new(), CompanyId::new(), draft()).unwrap();
        m.apply(BoardMinuteTransition::Finalised {
            finalised_date: "2025-03-12".into(),
        })
        .unwrap();
        let again = m
            .apply(BoardMinuteTransition::Finalised {
                finalised_date: "2025-04-01".into(),
            })
            .unwrap();
        assert_eq!(again, TransitionOutcome::Unchanged);
        assert_eq!(
            m.finalised_date.unwrap().to_iso8601(),
            "2025-03-12T00:00:00Z"
        );
    }
}
