//! # OpenAPI Document
//!
//! Generated from the `utoipa` annotations on the explicit route
//! modules and served at `/openapi.json`. The generic register routes
//! share one shape across kinds and are described in the document's
//! top-level description rather than enumerated per kind.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// The API document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "statreg API",
        description = "Statutory register administration: companies, \
            registers (allotments, shareholders, directors, share classes, \
            beneficial owners, charges, meetings, board minutes), an \
            immutable activity log, and two-phase CSV bulk import. Every \
            register kind serves the same route shape under \
            /v1/companies/{company_id}/<kind>: list, create, fetch, \
            update, status transition, delete.",
    ),
    paths(
        crate::routes::companies::create_company,
        crate::routes::companies::list_companies,
        crate::routes::companies::get_company,
        crate::routes::companies::delete_company,
        crate::routes::share_classes::set_default,
        crate::routes::activities::list_activities,
        crate::routes::activities::activity_stats,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::state::Company,
        crate::routes::companies::CreateCompanyRequest,
    )),
    tags(
        (name = "companies", description = "Company records"),
        (name = "share-classes", description = "Share class default flag"),
        (name = "activities", description = "Activity log queries"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
