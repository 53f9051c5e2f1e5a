//! # Generic Register Mutation Service
//!
//! One service carries every register mutation through the same path:
//!
//! ```text
//! coerce draft → uniqueness check → store write → best-effort activity append
//! ```
//!
//! The activity append is strictly after the write and strictly
//! best-effort: a logging failure is traced and swallowed, never
//! propagated. A failed mutation appends nothing.

use statreg_activity::{ActivityKind, ActivityLog};
use statreg_core::{CompanyId, RecordId, Timestamp};

use crate::error::RegisterError;
use crate::records::ShareClass;
use crate::register::{Register, TransitionOutcome};
use crate::store::RegisterStore;

/// The generic mutation handler for one register kind.
///
/// Holds borrowed handles to the store and the activity log — the
/// owning state passes them in explicitly; there is no process-wide
/// singleton anywhere in the workspace.
pub struct RegisterService<'a, R: Register> {
    store: &'a RegisterStore<R>,
    log: &'a ActivityLog,
}

impl<'a, R: Register> RegisterService<'a, R> {
    /// Bind a service to its store and activity log.
    pub fn new(store: &'a RegisterStore<R>, log: &'a ActivityLog) -> Self {
        Self { store, log }
    }

    /// Create a record from a wire draft.
    pub fn create(
        &self,
        company_id: CompanyId,
        draft: R::Draft,
        actor: &str,
    ) -> Result<R, RegisterError> {
        let record = R::create(RecordId::new(), company_id, draft)?;

        if let Some(key) = record.unique_key() {
            if self.store.has_unique_conflict(company_id, &key, None) {
                return Err(RegisterError::Conflict(format!(
                    "{} '{key}' already exists for this company",
                    R::KIND
                )));
            }
        }

        self.store.insert(record.clone());
        self.append_activity(
            company_id,
            ActivityKind::Added,
            record.id(),
            record.describe(),
            actor,
        );
        Ok(record)
    }

    /// Update a record from a wire draft.
    pub fn update(
        &self,
        company_id: CompanyId,
        id: RecordId,
        draft: R::Draft,
        actor: &str,
    ) -> Result<R, RegisterError> {
        let mut record = self
            .store
            .get(company_id, id)
            .ok_or_else(|| RegisterError::not_found(R::KIND, id))?;

        record.update(draft)?;
        record.touch(Timestamp::now());

        if let Some(key) = record.unique_key() {
            if self.store.has_unique_conflict(company_id, &key, Some(id)) {
                return Err(RegisterError::Conflict(format!(
                    "{} '{key}' already exists for this company",
                    R::KIND
                )));
            }
        }

        if !self.store.replace(company_id, record.clone()) {
            return Err(RegisterError::not_found(R::KIND, id));
        }
        self.append_activity(
            company_id,
            ActivityKind::Updated,
            record.id(),
            record.describe(),
            actor,
        );
        Ok(record)
    }

    /// Apply a status transition. Status and its associated date move as
    /// one write under the store lock. Re-confirming the current state
    /// succeeds without a write and without an activity entry.
    pub fn transition(
        &self,
        company_id: CompanyId,
        id: RecordId,
        transition: R::Transition,
        actor: &str,
    ) -> Result<R, RegisterError> {
        let now = Timestamp::now();
        let outcome = self
            .store
            .modify(company_id, id, |record| {
                let outcome = record.apply(transition)?;
                if outcome.changed() {
                    record.touch(now);
                }
                Ok::<_, RegisterError>(outcome)
            })
            .ok_or_else(|| RegisterError::not_found(R::KIND, id))??;

        let record = self
            .store
            .get(company_id, id)
            .ok_or_else(|| RegisterError::not_found(R::KIND, id))?;

        if let TransitionOutcome::Applied { description } = outcome {
            self.append_activity(
                company_id,
                ActivityKind::StatusChanged,
                record.id(),
                description,
                actor,
            );
        }
        Ok(record)
    }

    /// Fetch a record.
    pub fn get(&self, company_id: CompanyId, id: RecordId) -> Result<R, RegisterError> {
        self.store
            .get(company_id, id)
            .ok_or_else(|| RegisterError::not_found(R::KIND, id))
    }

    /// List a company's records.
    pub fn list(&self, company_id: CompanyId) -> Vec<R> {
        self.store.list(company_id)
    }

    /// Hard-delete a record, where the register permits it.
    pub fn remove(
        &self,
        company_id: CompanyId,
        id: RecordId,
        actor: &str,
    ) -> Result<R, RegisterError> {
        let record = self
            .store
            .get(company_id, id)
            .ok_or_else(|| RegisterError::not_found(R::KIND, id))?;

        if !R::SUPPORTS_DELETE {
            return Err(RegisterError::Conflict(format!(
                "{} records are archived, not deleted",
                R::KIND
            )));
        }
        record.deletable()?;

        let removed = self
            .store
            .remove(company_id, id)
            .ok_or_else(|| RegisterError::not_found(R::KIND, id))?;
        self.append_activity(
            company_id,
            ActivityKind::Removed,
            removed.id(),
            removed.describe(),
            actor,
        );
        Ok(removed)
    }

    /// Append an activity entry, swallowing any failure. The mutation has
    /// already committed; its response must not depend on the log.
    fn append_activity(
        &self,
        company_id: CompanyId,
        kind: ActivityKind,
        record_id: RecordId,
        description: String,
        actor: &str,
    ) {
        if let Err(e) = self
            .log
            .record(company_id, kind, R::KIND, Some(record_id), description, actor)
        {
            tracing::warn!(
                register = %R::KIND,
                record = %record_id,
                error = %e,
                "activity append failed; mutation already committed"
            );
        }
    }
}

impl<'a> RegisterService<'a, ShareClass> {
    /// Make one share class the company default, clearing any previous
    /// default under the same store write lock. In-process the invariant
    /// is atomic; across a non-transactional remote store this remains
    /// the documented last-write-wins race.
    pub fn set_default(
        &self,
        company_id: CompanyId,
        id: RecordId,
        actor: &str,
    ) -> Result<ShareClass, RegisterError> {
        let now = Timestamp::now();
        let changed = self.store.modify_company(company_id, |classes| {
            let mut found = false;
            let mut changed = false;
            for class in classes {
                if class.id == id {
                    found = true;
                    if !class.is_default {
                        class.is_default = true;
                        class.touch(now);
                        changed = true;
                    }
                } else if class.is_default {
                    class.is_default = false;
                    class.touch(now);
                }
            }
            if found {
                Ok(changed)
            } else {
                Err(RegisterError::not_found(ShareClass::KIND, id))
            }
        })?;

        let record = self
            .store
            .get(company_id, id)
            .ok_or_else(|| RegisterError::not_found(ShareClass::KIND, id))?;

        if changed {
            self.append_activity(
                company_id,
                ActivityKind::StatusChanged,
                record.id,
                format!("share class {} made the default", record.code),
                actor,
            );
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{
        Allotment, AllotmentDraft, AllotmentTransition, Charge, ChargeDraft, Meeting, MeetingDraft,
        ShareClassDraft,
    };
    use statreg_activity::{ActivityFilter, Page};

    fn allotment_draft() -> AllotmentDraft {
        AllotmentDraft {
            allottee: "Ada Lovelace".into(),
            share_class: "Ordinary".into(),
            number_of_shares: "500".into(),
            price_per_share: "2.50".into(),
            currency: "GBP".into(),
            allotment_date: "2025-01-01".into(),
        }
    }

    fn charge_draft(code: &str) -> ChargeDraft {
        ChargeDraft {
            charge_code: code.into(),
            chargee: "First Bank".into(),
            description: "Fixed charge".into(),
            amount_secured: "1000".into(),
            currency: "GBP".into(),
            charge_date: "2024-01-01".into(),
        }
    }

    fn share_class_draft(code: &str) -> ShareClassDraft {
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
    fn test_create_coerces_and_logs_exactly_once() {
        let store = RegisterStore::<Allotment>::new();
        let log = ActivityLog::new();
        let service = RegisterService::new(&store, &log);
        let company = CompanyId::new();

        let record = service
            .create(company, allotment_draft(), "ada")
            .unwrap();
        assert_eq!(record.number_of_shares, 500);
        assert_eq!(record.price_per_share, 2.5);

        let entries = log.query(company, &ActivityFilter::default(), Page::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, ActivityKind::Added);
        assert_eq!(entries[0].record_id, Some(record.id));
        assert!(entries[0].recorded_at >= record.created_at);
        assert_eq!(entries[0].description, "500 Ordinary shares to Ada Lovelace");
    }

    #[test]
    fn test_failed_create_logs_nothing() {
        let store = RegisterStore::<Allotment>::new();
        let log = ActivityLog::new();
        let service = RegisterService::new(&store, &log);
        let company = CompanyId::new();

        let mut bad = allotment_draft();
        bad.number_of_shares = "many".into();
        assert!(service.create(company, bad, "ada").is_err());
        assert!(log.is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_logger_failure_never_blocks_the_mutation() {
        let store = RegisterStore::<Allotment>::new();
        let log = ActivityLog::with_capacity(0);
        let service = RegisterService::new(&store, &log);
        let company = CompanyId::new();

        let record = service.create(company, allotment_draft(), "ada");
        assert!(record.is_ok());
        assert_eq!(store.len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_update_missing_record_is_not_found() {
        let store = RegisterStore::<Allotment>::new();
        let log = ActivityLog::new();
        let service = RegisterService::new(&store, &log);

        let err = service
            .update(CompanyId::new(), RecordId::new(), allotment_draft(), "ada")
            .unwrap_err();
        assert!(matches!(err, RegisterError::NotFound { .. }));
        assert!(log.is_empty());
    }

    #[test]
    fn test_cross_company_access_does_not_resolve() {
        let store = RegisterStore::<Allotment>::new();
        let log = ActivityLog::new();
        let service = RegisterService::new(&store, &log);
        let company = CompanyId::new();
        let record = service.create(company, allotment_draft(), "ada").unwrap();

        let other = CompanyId::new();
        assert!(matches!(
            service.get(other, record.id),
            Err(RegisterError::NotFound { .. })
        ));
        assert!(matches!(
            service.update(other, record.id, allotment_draft(), "ada"),
            Err(RegisterError::NotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_charge_code_is_conflict() {
        let store = RegisterStore::<Charge>::new();
        let log = ActivityLog::new();
        let service = RegisterService::new(&store, &log);
        let company = CompanyId::new();

        service.create(company, charge_draft("CH-1"), "ada").unwrap();
        let err = service
            .create(company, charge_draft("CH-1"), "ada")
            .unwrap_err();
        assert!(matches!(err, RegisterError::Conflict(_)));
        // Only the first create logged.
        assert_eq!(log.len(), 1);

        // The same code in another company is fine.
        assert!(service
            .create(CompanyId::new(), charge_draft("CH-1"), "ada")
            .is_ok());
    }

    #[test]
    fn test_transition_logs_only_when_state_changes() {
        let store = RegisterStore::<Allotment>::new();
        let log = ActivityLog::new();
        let service = RegisterService::new(&store, &log);
        let company = CompanyId::new();
        let record = service.create(company, allotment_draft(), "ada").unwrap();

        service
            .transition(company, record.id, AllotmentTransition::Cancelled, "ada")
            .unwrap();
        // Re-confirming is fine but appends nothing.
        service
            .transition(company, record.id, AllotmentTransition::Cancelled, "ada")
            .unwrap();

        let filter = ActivityFilter {
            kind: Some(ActivityKind::StatusChanged),
            ..Default::default()
        };
        assert_eq!(log.query(company, &filter, Page::default()).len(), 1);
    }

    #[test]
    fn test_transition_on_missing_id_logs_nothing() {
        let store = RegisterStore::<Allotment>::new();
        let log = ActivityLog::new();
        let service = RegisterService::new(&store, &log);

        let err = service
            .transition(
                CompanyId::new(),
                RecordId::new(),
                AllotmentTransition::Cancelled,
                "ada",
            )
            .unwrap_err();
        assert!(matches!(err, RegisterError::NotFound { .. }));
        assert!(log.is_empty());
    }

    #[test]
    fn test_remove_is_refused_for_archival_registers() {
        let store = RegisterStore::<Allotment>::new();
        let log = ActivityLog::new();
        let service = RegisterService::new(&store, &log);
        let company = CompanyId::new();
        let record = service.create(company, allotment_draft(), "ada").unwrap();

        let err = service.remove(company, record.id, "ada").unwrap_err();
        assert!(matches!(err, RegisterError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_scheduled_meeting_logs_removed() {
        let store = RegisterStore::<Meeting>::new();
        let log = ActivityLog::new();
        let service = RegisterService::new(&store, &log);
        let company = CompanyId::new();
        let meeting = service
            .create(
                company,
                MeetingDraft {
                    title: "EGM".into(),
                    meeting_date: "2025-07-01".into(),
                    location: None,
                    resolutions: vec![],
                },
                "ada",
            )
            .unwrap();

        service.remove(company, meeting.id, "ada").unwrap();
        assert!(store.is_empty());

        let filter = ActivityFilter {
            kind: Some(ActivityKind::Removed),
            ..Default::default()
        };
        assert_eq!(log.query(company, &filter, Page::default()).len(), 1);
    }

    #[test]
    fn test_set_default_flips_exactly_one() {
        let store = RegisterStore::new();
        let log = ActivityLog::new();
        let service = RegisterService::new(&store, &log);
        let company = CompanyId::new();

        let ord = service
            .create(company, share_class_draft("ORD"), "ada")
            .unwrap();
        let pref = service
            .create(company, share_class_draft("PREF"), "ada")
            .unwrap();

        service.set_default(company, ord.id, "ada").unwrap();
        service.set_default(company, pref.id, "ada").unwrap();

        let defaults: Vec<_> = store
            .list(company)
            .into_iter()
            .filter(|c| c.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, pref.id);
    }

    #[test]
    fn test_set_default_is_idempotent_and_quiet() {
        let store = RegisterStore::new();
        let log = ActivityLog::new();
        let service = RegisterService::new(&store, &log);
        let company = CompanyId::new();
        let ord = service
            .create(company, share_class_draft("ORD"), "ada")
            .unwrap();

        service.set_default(company, ord.id, "ada").unwrap();
        let before = log.len();
        service.set_default(company, ord.id, "ada").unwrap();
        assert_eq!(log.len(), before);
    }

    #[test]
    fn test_concurrent_set_default_leaves_exactly_one_default() {
        use std::sync::Arc;

        let store = Arc::new(RegisterStore::<ShareClass>::new());
        let log = Arc::new(ActivityLog::new());
        let company = CompanyId::new();

        let ids: Vec<RecordId> = (0..4)
            .map(|i| {
                RegisterService::new(&store, &log)
                    .create(company, share_class_draft(&format!("C{i}")), "ada")
                    .unwrap()
                    .id
            })
            .collect();

        let handles: Vec<_> = ids
            .iter()
            .map(|&id| {
                let store = Arc::clone(&store);
                let log = Arc::clone(&log);
                std::thread::spawn(move || {
                    RegisterService::new(&store, &log)
                        .set_default(company, id, "ada")
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        // Which class wins is unspecified; that exactly one wins is not.
        let defaults = store
            .list(company)
            .into_iter()
            .filter(|c| c.is_default)
            .count();
        assert_eq!(defaults, 1);
    }
}
