//! # Application State
//!
//! Shared state for the Axum application: the typed register stores, the
//! activity log, import staging areas, the user directory, the
//! permission gate, and the optional Postgres pool. Everything a handler
//! touches is reached through this struct — there are no module-level
//! singletons anywhere in the workspace.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use statreg_activity::ActivityLog;
use statreg_authz::PermissionGate;
use statreg_core::{CompanyId, Timestamp};
use statreg_import::StagingArea;
use statreg_registers::{
    Allotment, AllotmentDraft, BeneficialOwner, BoardMinute, Charge, Director, DirectorDraft,
    Meeting, Register, RegisterStore, ShareClass, Shareholder, ShareholderDraft,
};

use crate::auth::UserDirectory;

/// Application configuration, read from the environment at startup.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Bearer token that resolves to the built-in administrator. When
    /// unset and no other users are registered, the server runs open
    /// (development mode).
    pub auth_token: Option<String>,
}

/// A company record — the tenancy boundary every register hangs off.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Company {
    /// Unique company identifier.
    #[schema(value_type = String)]
    pub id: CompanyId,
    /// Registered company name.
    pub name: String,
    /// Jurisdiction of incorporation.
    pub jurisdiction: String,
    /// When the record was created.
    #[schema(value_type = String)]
    pub created_at: Timestamp,
    /// When the record was last written.
    #[schema(value_type = String)]
    pub updated_at: Timestamp,
}

/// In-memory store of companies.
#[derive(Debug, Default)]
pub struct CompanyStore {
    companies: RwLock<HashMap<CompanyId, Company>>,
}

impl CompanyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a company record.
    pub fn insert(&self, company: Company) {
        self.companies.write().insert(company.id, company);
    }

    /// Fetch a company.
    pub fn get(&self, id: CompanyId) -> Option<Company> {
        self.companies.read().get(&id).cloned()
    }

    /// Whether the company exists.
    pub fn exists(&self, id: CompanyId) -> bool {
        self.companies.read().contains_key(&id)
    }

    /// Remove a company record.
    pub fn remove(&self, id: CompanyId) -> Option<Company> {
        self.companies.write().remove(&id)
    }

    /// All companies, sorted by creation time.
    pub fn list(&self) -> Vec<Company> {
        let mut all: Vec<Company> = self.companies.read().values().cloned().collect();
        all.sort_by_key(|c| c.created_at);
        all
    }

    /// Number of companies.
    pub fn len(&self) -> usize {
        self.companies.read().len()
    }

    /// Whether the store holds no companies.
    pub fn is_empty(&self) -> bool {
        self.companies.read().is_empty()
    }
}

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Configuration snapshot.
    pub config: AppConfig,
    /// Companies (the tenancy boundary).
    pub companies: Arc<CompanyStore>,
    /// Register of allotments.
    pub allotments: Arc<RegisterStore<Allotment>>,
    /// Register of members.
    pub shareholders: Arc<RegisterStore<Shareholder>>,
    /// Register of directors.
    pub directors: Arc<RegisterStore<Director>>,
    /// Share classes.
    pub share_classes: Arc<RegisterStore<ShareClass>>,
    /// Register of beneficial owners.
    pub beneficial_owners: Arc<RegisterStore<BeneficialOwner>>,
    /// Register of charges.
    pub charges: Arc<RegisterStore<Charge>>,
    /// General meetings.
    pub meetings: Arc<RegisterStore<Meeting>>,
    /// Board minutes.
    pub board_minutes: Arc<RegisterStore<BoardMinute>>,
    /// The append-only activity log.
    pub activity: Arc<ActivityLog>,
    /// Staged shareholder imports.
    pub shareholder_staging: Arc<StagingArea<ShareholderDraft>>,
    /// Staged director imports.
    pub director_staging: Arc<StagingArea<DirectorDraft>>,
    /// Staged allotment imports.
    pub allotment_staging: Arc<StagingArea<AllotmentDraft>>,
    /// Token → user resolution.
    pub users: Arc<UserDirectory>,
    /// The pre-handler permission check.
    pub gate: PermissionGate,
    /// Optional Postgres pool; `None` runs in-memory only.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    /// Build a fresh in-memory state with default configuration.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default(), None)
    }

    /// Build state from configuration and an optional database pool.
    pub fn with_config(config: AppConfig, db_pool: Option<PgPool>) -> Self {
        let users = Arc::new(UserDirectory::new());
        if let Some(token) = &config.auth_token {
            users.register_admin_token(token);
        }
        Self {
            config,
            companies: Arc::new(CompanyStore::new()),
            allotments: Arc::new(RegisterStore::new()),
            shareholders: Arc::new(RegisterStore::new()),
            directors: Arc::new(RegisterStore::new()),
            share_classes: Arc::new(RegisterStore::new()),
            beneficial_owners: Arc::new(RegisterStore::new()),
            charges: Arc::new(RegisterStore::new()),
            meetings: Arc::new(RegisterStore::new()),
            board_minutes: Arc::new(RegisterStore::new()),
            activity: Arc::new(ActivityLog::new()),
            shareholder_staging: Arc::new(StagingArea::new()),
            director_staging: Arc::new(StagingArea::new()),
            allotment_staging: Arc::new(StagingArea::new()),
            users,
            gate: PermissionGate,
            db_pool,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Access to the typed store for one register kind.
///
/// The generic register routes are written once against this trait and
/// instantiated per kind; each impl simply points at the right field.
pub trait HasRegister<R: Register> {
    /// The store holding `R` records.
    fn register_store(&self) -> &RegisterStore<R>;
}

/// Access to the staging area for one importable register kind.
pub trait HasStaging<R: Register> {
    /// The staging area holding previewed `R` drafts.
    fn staging_area(&self) -> &StagingArea<R::Draft>;
}

macro_rules! has_register {
    ($record:ty, $field:ident) => {
        impl HasRegister<$record> for AppState {
            fn register_store(&self) -> &RegisterStore<$record> {
                &self.$field
            }
        }
    };
}

has_register!(Allotment, allotments);
has_register!(Shareholder, shareholders);
has_register!(Director, directors);
has_register!(ShareClass, share_classes);
has_register!(BeneficialOwner, beneficial_owners);
has_register!(Charge, charges);
has_register!(Meeting, meetings);
has_register!(BoardMinute, board_minutes);

macro_rules! has_staging {
    ($record:ty, $field:ident) => {
        impl HasStaging<$record> for AppState {
            fn staging_area(&self) -> &StagingArea<<$record as Register>::Draft> {
                &self.$field
            }
        }
    };
}

has_staging!(Shareholder, shareholder_staging);
has_staging!(Director, director_staging);
has_staging!(Allotment, allotment_staging);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_store_roundtrip() {
        let store = CompanyStore::new();
        let now = Timestamp::now();
        let company = Company {
            id: CompanyId::new(),
            name: "Acme Ltd".into(),
            jurisdiction: "England and Wales".into(),
            created_at: now,
            updated_at: now,
        };
        store.insert(company.clone());
        assert!(store.exists(company.id));
        assert_eq!(store.get(company.id).unwrap().name, "Acme Ltd");
        assert_eq!(store.list().len(), 1);

        store.remove(company.id);
        assert!(store.is_empty());
    }

    #[test]
    fn test_state_exposes_every_register_store() {
        let state = AppState::new();
        // Instantiation through the trait is what the routes rely on.
        let _: &RegisterStore<Allotment> = state.register_store();
        let _: &RegisterStore<BoardMinute> = state.register_store();
        let _: &StagingArea<ShareholderDraft> = HasStaging::<Shareholder>::staging_area(&state);
        assert!(state.companies.is_empty());
    }

    #[test]
    fn test_auth_token_registers_admin() {
        let state = AppState::with_config(
            AppConfig {
                auth_token: Some("secret".into()),
            },
            None,
        );
        assert!(state.users.resolve("secret").is_some());
        assert!(state.users.has_tokens());
    }
}
