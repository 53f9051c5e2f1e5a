//! # API Route Modules
//!
//! Route modules for the register stack API surface:
//!
//! - `companies` — the tenancy boundary: create, list, fetch, delete.
//! - `registers` — ONE generic router constructor covering every
//!   statutory register (list/create/get/update/status/delete),
//!   instantiated per kind in `lib.rs`. The per-kind variation lives in
//!   the `Register` strategy trait, not in copied handler modules.
//! - `share_classes` — the set-default operation, which spans records
//!   and so does not fit the generic shape.
//! - `imports` — two-phase CSV bulk import (preview/confirm) for the
//!   registers that support file ingestion.
//! - `activities` — the activity log query and statistics surface.

pub mod activities;
pub mod companies;
pub mod imports;
pub mod registers;
pub mod share_classes;

use statreg_authz::Permission;
use statreg_core::CompanyId;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Run the permission gate, then check the target company exists.
///
/// The gate runs first so an unauthorized caller learns nothing about
/// which companies exist.
pub(crate) fn require(
    state: &AppState,
    user: &CurrentUser,
    permission: Permission,
    company_id: CompanyId,
) -> Result<(), AppError> {
    state
        .gate
        .authorize(user.user(), Some(permission), Some(company_id))?;
    if !state.companies.exists(company_id) {
        return Err(AppError::NotFound(format!("company {company_id} not found")));
    }
    Ok(())
}
