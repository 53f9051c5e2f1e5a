//! # Company Routes
//!
//! The tenancy boundary. Companies are one of the few record types that
//! support hard deletion.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;

use statreg_authz::Permission;
use statreg_core::{CompanyId, Timestamp};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, Validate};
use crate::state::{AppState, Company};

/// Request to create a company.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCompanyRequest {
    /// Registered company name.
    pub name: String,
    /// Jurisdiction of incorporation.
    pub jurisdiction: String,
}

impl Validate for CreateCompanyRequest {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name must not be empty".to_string());
        }
        if self.name.len() > 255 {
            return Err("name must not exceed 255 characters".to_string());
        }
        if self.jurisdiction.trim().is_empty() {
            return Err("jurisdiction must not be empty".to_string());
        }
        Ok(())
    }
}

/// Build the companies router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/companies", get(list_companies).post(create_company))
        .route(
            "/v1/companies/:company_id",
            get(get_company).delete(delete_company),
        )
}

/// POST /v1/companies — Create a company.
#[utoipa::path(
    post,
    path = "/v1/companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Company created", body = Company),
        (status = 422, description = "Invalid request", body = crate::error::ErrorBody),
    ),
    tag = "companies"
)]
pub(crate) async fn create_company(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Company>), AppError> {
    state
        .gate
        .authorize(user.user(), Some(Permission::CompaniesManage), None)?;
    let req = extract_validated_json(body)?;

    let now = Timestamp::now();
    let company = Company {
        id: CompanyId::new(),
        name: req.name.trim().to_string(),
        jurisdiction: req.jurisdiction.trim().to_string(),
        created_at: now,
        updated_at: now,
    };
    state.companies.insert(company.clone());

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::companies::save(pool, &company).await {
            tracing::error!(company = %company.id, error = %e, "failed to persist company");
            return Err(AppError::Dependency("company persist failed".to_string()));
        }
    }
    Ok((StatusCode::CREATED, Json(company)))
}

/// GET /v1/companies — List companies.
#[utoipa::path(
    get,
    path = "/v1/companies",
    responses((status = 200, description = "All companies", body = [Company])),
    tag = "companies"
)]
pub(crate) async fn list_companies(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Company>>, AppError> {
    state.gate.authorize(user.user(), None, None)?;
    Ok(Json(state.companies.list()))
}

/// GET /v1/companies/:company_id — Fetch a company.
#[utoipa::path(
    get,
    path = "/v1/companies/{company_id}",
    params(("company_id" = String, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Company found", body = Company),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "companies"
)]
pub(crate) async fn get_company(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Company>, AppError> {
    state.gate.authorize(user.user(), None, Some(company_id))?;
    state
        .companies
        .get(company_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("company {company_id} not found")))
}

/// DELETE /v1/companies/:company_id — Delete a company.
#[utoipa::path(
    delete,
    path = "/v1/companies/{company_id}",
    params(("company_id" = String, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Company deleted", body = Company),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "companies"
)]
pub(crate) async fn delete_company(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Company>, AppError> {
    state
        .gate
        .authorize(user.user(), Some(Permission::CompaniesManage), Some(company_id))?;

    let removed = state
        .companies
        .remove(company_id)
        .ok_or_else(|| AppError::NotFound(format!("company {company_id} not found")))?;

    if let Some(pool) = &state.db_pool {
        if let Err(e) = crate::db::companies::delete(pool, company_id).await {
            tracing::error!(company = %company_id, error = %e, "failed to delete persisted company");
            return Err(AppError::Dependency("company delete failed".to_string()));
        }
    }
    Ok(Json(removed))
}
