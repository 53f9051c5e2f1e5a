//! # Generic Register Routes
//!
//! One router constructor serves every statutory register:
//!
//! - `GET    /v1/companies/:company_id/<kind>` — list
//! - `POST   /v1/companies/:company_id/<kind>` — create
//! - `GET    /v1/companies/:company_id/<kind>/:id` — fetch
//! - `PUT    /v1/companies/:company_id/<kind>/:id` — update
//! - `PUT    /v1/companies/:company_id/<kind>/:id/status` — transition
//! - `DELETE /v1/companies/:company_id/<kind>/:id` — delete (where the
//!   register permits it; archival registers answer 409)
//!
//! Handlers run the permission gate, hand the work to the generic
//! `RegisterService`, write through to Postgres when configured, and
//! flush pending activity entries best-effort.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Extension, Json, Router};
use serde::Serialize;

use statreg_authz::Permission;
use statreg_core::{CompanyId, RecordId};
use statreg_registers::{Register, RegisterService};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extractors::extract_json;
use crate::routes::require;
use crate::state::{AppState, HasRegister};

/// Build the six routes for one register kind under `segment`.
pub fn router<R>(segment: &'static str) -> Router<AppState>
where
    R: Register + Serialize,
    AppState: HasRegister<R>,
{
    let base = format!("/v1/companies/:company_id/{segment}");
    let item = format!("{base}/:id");
    let status = format!("{item}/status");
    Router::new()
        .route(&base, get(list::<R>).post(create::<R>))
        .route(
            &item,
            get(get_one::<R>).put(update::<R>).delete(remove::<R>),
        )
        .route(&status, put(transition::<R>))
}

/// Persist a record write-through. Failure surfaces to the client — the
/// in-memory record would be lost on restart, causing silent data loss.
async fn persist<R>(state: &AppState, record: &R) -> Result<(), AppError>
where
    R: Register + Serialize,
{
    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::registers::save(pool, record).await {
            tracing::error!(
                register = %R::KIND,
                record = %record.id(),
                error = %e,
                "failed to persist register record"
            );
            return Err(AppError::Dependency("register persist failed".to_string()));
        }
    }
    Ok(())
}

async fn create<R>(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<R::Draft>, JsonRejection>,
) -> Result<(StatusCode, Json<R>), AppError>
where
    R: Register + Serialize,
    AppState: HasRegister<R>,
{
    require(&state, &user, Permission::RegistersWrite, company_id)?;
    let draft = extract_json(body)?;

    let record = RegisterService::new(state.register_store(), &state.activity).create(
        company_id,
        draft,
        &user.actor_label(),
    )?;

    persist(&state, &record).await?;
    crate::db::activities::flush(&state).await;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn list<R>(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<R>>, AppError>
where
    R: Register + Serialize,
    AppState: HasRegister<R>,
{
    require(&state, &user, Permission::RegistersRead, company_id)?;
    Ok(Json(state.register_store().list(company_id)))
}

async fn get_one<R>(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(CompanyId, RecordId)>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<R>, AppError>
where
    R: Register + Serialize,
    AppState: HasRegister<R>,
{
    require(&state, &user, Permission::RegistersRead, company_id)?;
    let record =
        RegisterService::new(state.register_store(), &state.activity).get(company_id, id)?;
    Ok(Json(record))
}

async fn update<R>(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(CompanyId, RecordId)>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<R::Draft>, JsonRejection>,
) -> Result<Json<R>, AppError>
where
    R: Register + Serialize,
    AppState: HasRegister<R>,
{
    require(&state, &user, Permission::RegistersWrite, company_id)?;
    let draft = extract_json(body)?;

    let record = RegisterService::new(state.register_store(), &state.activity).update(
        company_id,
        id,
        draft,
        &user.actor_label(),
    )?;

    persist(&state, &record).await?;
    crate::db::activities::flush(&state).await;
    Ok(Json(record))
}

async fn transition<R>(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(CompanyId, RecordId)>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<R::Transition>, JsonRejection>,
) -> Result<Json<R>, AppError>
where
    R: Register + Serialize,
    AppState: HasRegister<R>,
{
    require(&state, &user, Permission::RegistersWrite, company_id)?;
    let transition = extract_json(body)?;

    let record = RegisterService::new(state.register_store(), &state.activity).transition(
        company_id,
        id,
        transition,
        &user.actor_label(),
    )?;

    persist(&state, &record).await?;
    crate::db::activities::flush(&state).await;
    Ok(Json(record))
}

async fn remove<R>(
    State(state): State<AppState>,
    Path((company_id, id)): Path<(CompanyId, RecordId)>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<R>, AppError>
where
    R: Register + Serialize,
    AppState: HasRegister<R>,
{
    require(&state, &user, Permission::RegistersWrite, company_id)?;

    let removed = RegisterService::new(state.register_store(), &state.activity).remove(
        company_id,
        id,
        &user.actor_label(),
    )?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::registers::delete(pool, id).await {
            tracing::error!(register = %R::KIND, record = %id, error = %e,
                "failed to delete persisted register record");
            return Err(AppError::Dependency("register delete failed".to_string()));
        }
    }
    crate::db::activities::flush(&state).await;
    Ok(Json(removed))
}
