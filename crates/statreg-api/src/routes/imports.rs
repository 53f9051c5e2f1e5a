//! # Bulk Import Routes
//!
//! The two-phase CSV import surface, one generic pair of routes per
//! importable register kind:
//!
//! - `POST /v1/companies/:company_id/<kind>/import/preview` — the CSV
//!   file as the request body; returns candidates and per-row errors,
//!   persists nothing.
//! - `POST /v1/companies/:company_id/<kind>/import/confirm` — commits
//!   the batch previously previewed by this user for this company.
//!
//! Import uploads get a raised body limit; the rest of the API keeps the
//! default.

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::routing::post;
use axum::{Extension, Json, Router};
use serde::Serialize;

use statreg_authz::Permission;
use statreg_core::CompanyId;
use statreg_import::{CommitError, CsvDraft, ImportPipeline, RowError};
use statreg_registers::Register;

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::routes::require;
use crate::state::{AppState, HasRegister, HasStaging};

/// Import uploads may be larger than regular JSON bodies: 16 MiB.
const IMPORT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// The preview response: what would be imported, and which rows failed.
#[derive(Debug, Serialize)]
pub struct PreviewResponse<D> {
    /// Candidate drafts parsed from valid rows, in file order.
    pub candidates: Vec<D>,
    /// Rows that failed to parse.
    pub errors: Vec<RowError>,
    /// Whether a batch is now staged for confirmation.
    pub staged: bool,
}

/// The confirm response.
#[derive(Debug, Serialize)]
pub struct ConfirmResponse {
    /// Records created.
    pub imported: usize,
    /// Rows skipped at commit time.
    pub skipped: Vec<CommitError>,
}

/// Build the preview/confirm routes for one importable register kind.
pub fn router<R>(segment: &'static str) -> Router<AppState>
where
    R: Register,
    R::Draft: CsvDraft + Serialize,
    AppState: HasRegister<R> + HasStaging<R>,
{
    let base = format!("/v1/companies/:company_id/{segment}/import");
    Router::new()
        .route(&format!("{base}/preview"), post(preview::<R>))
        .route(&format!("{base}/confirm"), post(confirm::<R>))
        .layer(DefaultBodyLimit::max(IMPORT_BODY_LIMIT))
}

async fn preview<R>(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Extension(user): Extension<CurrentUser>,
    body: Bytes,
) -> Result<Json<PreviewResponse<R::Draft>>, AppError>
where
    R: Register,
    R::Draft: CsvDraft + Serialize,
    AppState: HasRegister<R> + HasStaging<R>,
{
    require(&state, &user, Permission::ImportWrite, company_id)?;

    let pipeline = ImportPipeline::<R>::new(
        state.register_store(),
        &state.activity,
        state.staging_area(),
    );
    let preview = pipeline.preview(company_id, user.user().id, &body)?;

    Ok(Json(PreviewResponse {
        candidates: preview.candidates,
        errors: preview.errors,
        staged: preview.staged,
    }))
}

async fn confirm<R>(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ConfirmResponse>, AppError>
where
    R: Register + Serialize,
    R::Draft: CsvDraft + Serialize,
    AppState: HasRegister<R> + HasStaging<R>,
{
    require(&state, &user, Permission::ImportWrite, company_id)?;

    let pipeline = ImportPipeline::<R>::new(
        state.register_store(),
        &state.activity,
        state.staging_area(),
    );
    let outcome = pipeline.confirm(company_id, user.user().id, &user.actor_label())?;

    // Write the freshly imported records through to the database.
    if let Some(pool) = &state.db_pool {
        let records: Vec<R> = state.register_store().list(company_id);
        for record in records {
            if let Err(e) = crate::db::registers::save(pool, &record).await {
                tracing::error!(register = %R::KIND, error = %e,
                    "failed to persist imported register record");
                return Err(AppError::Dependency("import persist failed".to_string()));
            }
        }
    }
    crate::db::activities::flush(&state).await;

    Ok(Json(ConfirmResponse {
        imported: outcome.imported,
        skipped: outcome.skipped,
    }))
}
