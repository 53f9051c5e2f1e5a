//! # Append-Only Activity Log
//!
//! In-process log of [`ActivityRecord`]s behind a `parking_lot::RwLock`.
//! Entries are appended after a mutation commits and are never modified
//! or removed afterwards. Queries filter by company plus optional record
//! reference, activity kind, and date range, newest first.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use statreg_core::{ActivityId, CompanyId, RecordId, RegisterKind, Timestamp};

use crate::record::{ActivityKind, ActivityRecord};

/// Failure while appending an activity entry.
///
/// Callers on the mutation path must treat this as best-effort: log the
/// failure and return the mutation result anyway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivityError {
    /// The log's configured capacity is exhausted.
    #[error("activity log capacity of {0} entries is exhausted")]
    CapacityExhausted(usize),
}

/// Filters for an activity query. Empty filter matches everything in the
/// queried company.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityFilter {
    /// Only entries for this register kind.
    pub register: Option<RegisterKind>,
    /// Only entries referencing this record.
    pub record_id: Option<RecordId>,
    /// Only entries of this activity kind.
    pub kind: Option<ActivityKind>,
    /// Only entries recorded at or after this instant.
    pub from: Option<Timestamp>,
    /// Only entries recorded at or before this instant.
    pub to: Option<Timestamp>,
}

impl ActivityFilter {
    fn matches(&self, record: &ActivityRecord) -> bool {
        if let Some(register) = self.register {
            if record.register != register {
                return false;
            }
        }
        if let Some(record_id) = self.record_id {
            if record.record_id != Some(record_id) {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if record.kind != kind {
                return false;
            }
        }
        if let Some(from) = self.from {
            if record.recorded_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.recorded_at > to {
                return false;
            }
        }
        true
    }
}

/// Pagination window for list queries.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Page {
    /// Maximum number of items to return (default: 100, max: 1000).
    pub limit: Option<usize>,
    /// Number of items to skip (default: 0).
    pub offset: Option<usize>,
}

impl Page {
    const DEFAULT_LIMIT: usize = 100;
    const MAX_LIMIT: usize = 1000;

    /// The limit actually applied, after clamping.
    pub fn effective_limit(&self) -> usize {
        self.limit.unwrap_or(Self::DEFAULT_LIMIT).min(Self::MAX_LIMIT)
    }

    /// The offset actually applied.
    pub fn effective_offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

/// Aggregate counts over a company's activity, for the statistics view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityStats {
    /// Total matching entries.
    pub total: u64,
    /// Entries grouped by activity kind.
    pub by_kind: BTreeMap<String, u64>,
    /// Entries grouped by register kind.
    pub by_register: BTreeMap<String, u64>,
    /// Entries grouped by actor.
    pub by_actor: BTreeMap<String, u64>,
    /// Entries grouped by `YYYY-MM` calendar month.
    pub by_month: BTreeMap<String, u64>,
}

/// The append-only activity log.
#[derive(Debug, Default)]
pub struct ActivityLog {
    entries: RwLock<Vec<ActivityRecord>>,
    /// Entries appended since the last [`ActivityLog::take_pending`] —
    /// the write-behind journal a persistence layer drains.
    pending: RwLock<Vec<ActivityRecord>>,
    capacity: Option<usize>,
}

impl ActivityLog {
    /// Create an unbounded log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a log that refuses appends beyond `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            pending: RwLock::new(Vec::new()),
            capacity: Some(capacity),
        }
    }

    /// Append one entry describing a just-committed mutation.
    ///
    /// Returns the stored record so callers can chain it into responses.
    #[allow(clippy::too_many_arguments)]
    pub fn record(
        &self,
        company_id: CompanyId,
        kind: ActivityKind,
        register: RegisterKind,
        record_id: Option<RecordId>,
        description: String,
        actor: &str,
    ) -> Result<ActivityRecord, ActivityError> {
        let entry = ActivityRecord {
            id: ActivityId::new(),
            company_id,
            kind,
            register,
            record_id,
            description,
            actor: actor.to_string(),
            recorded_at: Timestamp::now(),
        };

        let mut entries = self.entries.write();
        if let Some(capacity) = self.capacity {
            if entries.len() >= capacity {
                return Err(ActivityError::CapacityExhausted(capacity));
            }
        }
        entries.push(entry.clone());
        self.pending.write().push(entry.clone());
        Ok(entry)
    }

    /// Drain entries appended since the last drain. The persistence
    /// layer calls this after each mutation; with no persistence
    /// configured the drained entries are simply dropped, keeping the
    /// journal bounded by one request cycle.
    pub fn take_pending(&self) -> Vec<ActivityRecord> {
        std::mem::take(&mut *self.pending.write())
    }

    /// Re-insert a previously persisted entry, preserving its identity and
    /// timestamp. Used when reloading from the database on boot.
    pub fn restore(&self, entry: ActivityRecord) {
        self.entries.write().push(entry);
    }

    /// Query a company's entries, newest first, with filters and pagination.
    pub fn query(
        &self,
        company_id: CompanyId,
        filter: &ActivityFilter,
        page: Page,
    ) -> Vec<ActivityRecord> {
        let entries = self.entries.read();
        let mut matching: Vec<ActivityRecord> = entries
            .iter()
            .filter(|e| e.company_id == company_id && filter.matches(e))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at).then(b.id.0.cmp(&a.id.0)));
        matching
            .into_iter()
            .skip(page.effective_offset())
            .take(page.effective_limit())
            .collect()
    }

    /// Aggregate statistics over a company's entries.
    pub fn stats(&self, company_id: CompanyId) -> ActivityStats {
        let entries = self.entries.read();
        let mut stats = ActivityStats::default();
        for entry in entries.iter().filter(|e| e.company_id == company_id) {
            stats.total += 1;
            *stats
                .by_kind
                .entry(entry.kind.as_str().to_string())
                .or_default() += 1;
            *stats
                .by_register
                .entry(entry.register.as_str().to_string())
                .or_default() += 1;
            *stats.by_actor.entry(entry.actor.clone()).or_default() += 1;
            *stats
                .by_month
                .entry(entry.recorded_at.month_key())
                .or_default() += 1;
        }
        stats
    }

    /// Total entries across all companies.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the log holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn log_one(log: &ActivityLog, company: CompanyId, kind: ActivityKind) -> ActivityRecord {
        log.record(
            company,
            kind,
            RegisterKind::Allotment,
            Some(RecordId::new()),
            "500 Ordinary shares to Ada Lovelace".into(),
            "ada",
        )
        .unwrap()
    }

    #[test]
    fn test_record_returns_stored_entry() {
        let log = ActivityLog::new();
        let company = CompanyId::new();
        let entry = log_one(&log, company, ActivityKind::Added);
        assert_eq!(entry.company_id, company);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_query_is_company_scoped() {
        let log = ActivityLog::new();
        let a = CompanyId::new();
        let b = CompanyId::new();
        log_one(&log, a, ActivityKind::Added);
        log_one(&log, b, ActivityKind::Added);

        let results = log.query(a, &ActivityFilter::default(), Page::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].company_id, a);
    }

    #[test]
    fn test_query_filters_by_kind_and_record() {
        let log = ActivityLog::new();
        let company = CompanyId::new();
        let added = log_one(&log, company, ActivityKind::Added);
        log_one(&log, company, ActivityKind::Updated);

        let filter = ActivityFilter {
            kind: Some(ActivityKind::Added),
            ..Default::default()
        };
        let results = log.query(company, &filter, Page::default());
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, added.id);

        let filter = ActivityFilter {
            record_id: added.record_id,
            ..Default::default()
        };
        let results = log.query(company, &filter, Page::default());
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_query_date_range() {
        let log = ActivityLog::new();
        let company = CompanyId::new();
        let entry = log_one(&log, company, ActivityKind::Added);

        let filter = ActivityFilter {
            from: Some(entry.recorded_at),
            ..Default::default()
        };
        assert_eq!(log.query(company, &filter, Page::default()).len(), 1);

        let filter = ActivityFilter {
            to: Some(Timestamp::from_epoch_secs(entry.recorded_at.epoch_secs() - 60).unwrap()),
            ..Default::default()
        };
        assert!(log.query(company, &filter, Page::default()).is_empty());
    }

    #[test]
    fn test_pagination_clamps_limit() {
        let page = Page {
            limit: Some(5000),
            offset: None,
        };
        assert_eq!(page.effective_limit(), 1000);
        assert_eq!(Page::default().effective_limit(), 100);
    }

    #[test]
    fn test_pagination_window() {
        let log = ActivityLog::new();
        let company = CompanyId::new();
        for _ in 0..5 {
            log_one(&log, company, ActivityKind::Added);
        }
        let page = Page {
            limit: Some(2),
            offset: Some(4),
        };
        assert_eq!(log.query(company, &ActivityFilter::default(), page).len(), 1);
    }

    #[test]
    fn test_capacity_exhaustion_is_an_error() {
        let log = ActivityLog::with_capacity(1);
        let company = CompanyId::new();
        log_one(&log, company, ActivityKind::Added);
        let err = log
            .record(
                company,
                ActivityKind::Updated,
                RegisterKind::Director,
                Some(RecordId::new()),
                "x".into(),
                "ada",
            )
            .unwrap_err();
        assert_eq!(err, ActivityError::CapacityExhausted(1));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_take_pending_drains_the_journal() {
        let log = ActivityLog::new();
        let company = CompanyId::new();
        log_one(&log, company, ActivityKind::Added);
        log_one(&log, company, ActivityKind::Updated);

        assert_eq!(log.take_pending().len(), 2);
        assert_eq!(log.take_pending().len(), 0);
        // The main log is unaffected by draining.
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_restore_does_not_journal() {
        let log = ActivityLog::new();
        let company = CompanyId::new();
        let entry = log_one(&log, company, ActivityKind::Added);
        log.take_pending();

        log.restore(entry);
        assert!(log.take_pending().is_empty());
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_stats_group_by_kind_register_actor_month() {
        let log = ActivityLog::new();
        let company = CompanyId::new();
        log_one(&log, company, ActivityKind::Added);
        log_one(&log, company, ActivityKind::Added);
        log.record(
            company,
            ActivityKind::StatusChanged,
            RegisterKind::Charge,
            Some(RecordId::new()),
            "charge CH-1 satisfied".into(),
            "grace",
        )
        .unwrap();

        let stats = log.stats(company);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.by_kind.get("added"), Some(&2));
        assert_eq!(stats.by_kind.get("status_changed"), Some(&1));
        assert_eq!(stats.by_register.get("allotment"), Some(&2));
        assert_eq!(stats.by_actor.get("grace"), Some(&1));
        assert_eq!(stats.by_month.values().sum::<u64>(), 3);
    }
}
