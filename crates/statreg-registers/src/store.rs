//! # Company-Scoped In-Memory Store
//!
//! One typed store per register kind, a `parking_lot::RwLock` around a
//! `HashMap`. Every read and write takes the owning company id and checks
//! it against the stored record before acting — a record reached with the
//! wrong company simply does not resolve.
//!
//! Writes are last-write-wins; there is no cross-request concurrency
//! control at this layer. Multi-field updates happen under a single write
//! lock via [`RegisterStore::modify`], which is what makes a status
//! change and its associated date one write.

use std::collections::HashMap;

use parking_lot::RwLock;

use statreg_core::{CompanyId, RecordId};

use crate::register::Register;

/// Typed in-memory store for one register kind.
#[derive(Debug, Default)]
pub struct RegisterStore<R: Register> {
    records: RwLock<HashMap<RecordId, R>>,
}

impl<R: Register> RegisterStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }

    /// Insert a freshly created record.
    pub fn insert(&self, record: R) {
        self.records.write().insert(record.id(), record);
    }

    /// Fetch a record by `(company, id)`. A wrong-company id does not
    /// resolve.
    pub fn get(&self, company_id: CompanyId, id: RecordId) -> Option<R> {
        self.records
            .read()
            .get(&id)
            .filter(|r| r.company_id() == company_id)
            .cloned()
    }

    /// Replace a record wholesale, if it still resolves for the company.
    /// Returns `false` when the record is gone.
    pub fn replace(&self, company_id: CompanyId, record: R) -> bool {
        let mut records = self.records.write();
        match records.get(&record.id()) {
            Some(existing) if existing.company_id() == company_id => {
                records.insert(record.id(), record);
                true
            }
            _ => false,
        }
    }

    /// Mutate a record in place under the write lock. Returns `None` when
    /// the `(company, id)` pair does not resolve, otherwise the closure's
    /// output.
    pub fn modify<T>(
        &self,
        company_id: CompanyId,
        id: RecordId,
        f: impl FnOnce(&mut R) -> T,
    ) -> Option<T> {
        let mut records = self.records.write();
        let record = records
            .get_mut(&id)
            .filter(|r| r.company_id() == company_id)?;
        Some(f(record))
    }

    /// Mutate every record of one company under a single write lock.
    /// Used for invariants that span records, such as "exactly one
    /// default share class per company".
    pub fn modify_company<T>(
        &self,
        company_id: CompanyId,
        f: impl FnOnce(&mut dyn Iterator<Item = &mut R>) -> T,
    ) -> T {
        let mut records = self.records.write();
        let mut iter = records
            .values_mut()
            .filter(|r| r.company_id() == company_id);
        f(&mut iter)
    }

    /// Remove a record by `(company, id)`.
    pub fn remove(&self, company_id: CompanyId, id: RecordId) -> Option<R> {
        let mut records = self.records.write();
        match records.get(&id) {
            Some(existing) if existing.company_id() == company_id => records.remove(&id),
            _ => None,
        }
    }

    /// All records of one company, sorted oldest-insert-last-stable by id
    /// for deterministic listings.
    pub fn list(&self, company_id: CompanyId) -> Vec<R> {
        let mut records: Vec<R> = self
            .records
            .read()
            .values()
            .filter(|r| r.company_id() == company_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| *r.id().as_uuid());
        records
    }

    /// Every record across all companies (persistence and metrics).
    pub fn all(&self) -> Vec<R> {
        self.records.read().values().cloned().collect()
    }

    /// Whether another record of this company already claims `key`.
    pub fn has_unique_conflict(
        &self,
        company_id: CompanyId,
        key: &str,
        exclude: Option<RecordId>,
    ) -> bool {
        self.records.read().values().any(|r| {
            r.company_id() == company_id
                && Some(r.id()) != exclude
                && r.unique_key().as_deref() == Some(key)
        })
    }

    /// Re-insert a previously persisted record on boot.
    pub fn restore(&self, record: R) {
        self.records.write().insert(record.id(), record);
    }

    /// Total records across all companies.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
