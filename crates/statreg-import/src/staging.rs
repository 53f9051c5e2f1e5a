//! # Server-Side Import Staging
//!
//! Holds previewed batches between the two HTTP calls of the import
//! protocol. Keyed by `(company, actor)`: each user stages at most one
//! batch per company, a new preview replaces the old batch, and confirm
//! consumes the batch atomically.

use std::collections::HashMap;

use parking_lot::RwLock;

use statreg_core::{CompanyId, Timestamp, UserId};

/// A previewed batch awaiting confirmation.
#[derive(Debug, Clone)]
pub struct StagedBatch<D> {
    /// The parsed candidate drafts, in file order.
    pub drafts: Vec<D>,
    /// When the batch was staged.
    pub staged_at: Timestamp,
}

/// The staging area for one register kind's imports.
#[derive(Debug)]
pub struct StagingArea<D> {
    batches: RwLock<HashMap<(CompanyId, UserId), StagedBatch<D>>>,
}

impl<D> Default for StagingArea<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> StagingArea<D> {
    /// Create an empty staging area.
    pub fn new() -> Self {
        Self {
            batches: RwLock::new(HashMap::new()),
        }
    }

    /// Stage a previewed batch, replacing any batch the same user had
    /// previously staged for the same company.
    pub fn stage(&self, company_id: CompanyId, actor: UserId, drafts: Vec<D>) {
        self.batches.write().insert(
            (company_id, actor),
            StagedBatch {
                drafts,
                staged_at: Timestamp::now(),
            },
        );
    }

    /// Take the staged batch for `(company, actor)`, removing it.
    pub fn take(&self, company_id: CompanyId, actor: UserId) -> Option<StagedBatch<D>> {
        self.batches.write().remove(&(company_id, actor))
    }

    /// Whether a batch is staged for `(company, actor)`.
    pub fn has_staged(&self, company_id: CompanyId, actor: UserId) -> bool {
        self.batches.read().contains_key(&(company_id, actor))
    }

    /// Number of staged batches across all keys.
    pub fn len(&self) -> usize {
        self.batches.read().len()
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.batches.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_take_consumes() {
        let area = StagingArea::new();
        let company = CompanyId::new();
        let actor = UserId::new();
        area.stage(company, actor, vec!["row".to_string()]);
        assert!(area.has_staged(company, actor));

        let batch = area.take(company, actor).unwrap();
        assert_eq!(batch.drafts, vec!["row".to_string()]);
        assert!(area.take(company, actor).is_none());
    }

    #[test]
    fn test_new_preview_replaces_old_batch() {
        let area = StagingArea::new();
        let company = CompanyId::new();
        let actor = UserId::new();
        area.stage(company, actor, vec!["old".to_string()]);
        area.stage(company, actor, vec!["new-1".to_string(), "new-2".to_string()]);

        let batch = area.take(company, actor).unwrap();
        assert_eq!(batch.drafts.len(), 2);
        assert_eq!(batch.drafts[0], "new-1");
    }

    #[test]
    fn test_staging_is_keyed_per_company_and_user() {
        let area = StagingArea::new();
        let company = CompanyId::new();
        let ada = UserId::new();
        let grace = UserId::new();
        area.stage(company, ada, vec!["ada's".to_string()]);

        assert!(!area.has_staged(company, grace));
        assert!(!area.has_staged(CompanyId::new(), ada));
        assert!(area.has_staged(company, ada));
    }
}
