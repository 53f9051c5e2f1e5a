//! # Share Class Default Route
//!
//! The set-default operation spans every share class of a company (the
//! previous default is cleared as the new one is set) and therefore does
//! not fit the generic per-record route shape. In-process the flip is
//! atomic under the store's write lock; across a non-transactional
//! remote store it stays the documented last-write-wins race.

use axum::extract::{Path, State};
use axum::routing::put;
use axum::{Extension, Json, Router};

use statreg_authz::Permission;
use statreg_core::{CompanyId, RecordId};
use statreg_registers::{RegisterService, ShareClass};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::routes::require;
use crate::state::AppState;

/// Build the share-class default router.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/v1/companies/:company_id/share-classes/:id/default",
        put(set_default),
    )
}

/// PUT /v1/companies/:company_id/share-classes/:id/default — Make one
/// share class the company default.
#[utoipa::path(
    put,
    path = "/v1/companies/{company_id}/share-classes/{id}/default",
    params(
        ("company_id" = String, Path, description = "Company ID"),
        ("id" = String, Path, description = "Share class ID"),
    ),
    responses(
        (status = 200, description = "Default share class updated"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "share-classes"
)]
pub(crate) async fn set_default(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(CompanyId, RecordId)>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ShareClass>, AppError> {
    require(&state, &user, Permission::RegistersWrite, company_id)?;

    let record = RegisterService::new(&state.share_classes, &state.activity).set_default(
        company_id,
        id,
        &user.actor_label(),
    )?;

    // The flip may have touched other classes; write the whole company's
    // share classes through.
    if let Some(pool) = &state.db_pool {
        for class in state.share_classes.list(company_id) {
            if let Err(e) = crate::db::registers::save(pool, &class).await {
                tracing::error!(company = %company_id, error = %e,
                    "failed to persist share class after default flip");
                return Err(AppError::Dependency("share class persist failed".to_string()));
            }
        }
    }
    crate::db::activities::flush(&state).await;
    Ok(Json(record))
}
