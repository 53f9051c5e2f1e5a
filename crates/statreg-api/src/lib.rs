//! # statreg-api — Axum API for the Statutory Register Stack
//!
//! The HTTP surface over the register domain: company records, the eight
//! statutory registers, the immutable activity log, and two-phase CSV
//! bulk import.
//!
//! ## API Surface
//!
//! | Prefix                                          | Module                  |
//! |-------------------------------------------------|-------------------------|
//! | `/v1/companies`                                 | [`routes::companies`]   |
//! | `/v1/companies/:id/<register-kind>`             | [`routes::registers`]   |
//! | `/v1/companies/:id/share-classes/:id/default`   | [`routes::share_classes`] |
//! | `/v1/companies/:id/<kind>/import/*`             | [`routes::imports`]     |
//! | `/v1/companies/:id/activities`                  | [`routes::activities`]  |
//! | `/openapi.json`                                 | [`openapi`]             |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! Health probes (`/health/*`) and `/metrics` are mounted outside the
//! auth middleware so they remain accessible without credentials.

pub mod auth;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use statreg_core::RegisterKind;
use statreg_registers::{
    Allotment, BeneficialOwner, BoardMinute, Charge, Director, Meeting, Shareholder,
};

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

/// Check if metrics are enabled via the `STATREG_METRICS_ENABLED` env
/// var. Defaults to `true` when the variable is absent or set to
/// anything other than `"false"`.
fn metrics_enabled() -> bool {
    std::env::var("STATREG_METRICS_ENABLED")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true)
}

/// Assemble the full application router with all routes and middleware.
///
/// Body size limit: 1 MiB for regular JSON bodies; the bulk-import
/// routes override it with their own larger limit.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let metrics_on = metrics_enabled();

    let api = Router::new()
        .merge(routes::companies::router())
        // The eight statutory registers, one generic constructor each.
        .merge(routes::registers::router::<Allotment>("allotments"))
        .merge(routes::registers::router::<Shareholder>("shareholders"))
        .merge(routes::registers::router::<Director>("directors"))
        .merge(routes::registers::router::<statreg_registers::ShareClass>(
            "share-classes",
        ))
        .merge(routes::registers::router::<BeneficialOwner>(
            "beneficial-owners",
        ))
        .merge(routes::registers::router::<Charge>("charges"))
        .merge(routes::registers::router::<Meeting>("meetings"))
        .merge(routes::registers::router::<BoardMinute>("board-minutes"))
        .merge(routes::share_classes::router())
        // Bulk import for the registers that support file ingestion.
        .merge(routes::imports::router::<Shareholder>("shareholders"))
        .merge(routes::imports::router::<Director>("directors"))
        .merge(routes::imports::router::<Allotment>("allotments"))
        .merge(routes::activities::router())
        .merge(openapi::router());

    let mut api = api
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(from_fn_with_state(state.clone(), auth::auth_middleware));

    // Only register the metrics middleware when metrics are enabled.
    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Unauthenticated health probes; readiness checks actual service health.
    let mut unauthenticated = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    if metrics_on {
        unauthenticated = unauthenticated
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    let unauthenticated = unauthenticated.with_state(state);

    Router::new().merge(unauthenticated).merge(api)
}

/// GET /metrics — Prometheus metrics scrape endpoint.
///
/// Updates domain gauges from current `AppState` on each scrape (pull
/// model), then gathers and encodes all metrics in text exposition
/// format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    metrics.companies_total().set(state.companies.len() as f64);

    let records = metrics.register_records_total();
    records.reset();
    let counts = [
        (RegisterKind::Allotment, state.allotments.len()),
        (RegisterKind::Shareholder, state.shareholders.len()),
        (RegisterKind::Director, state.directors.len()),
        (RegisterKind::ShareClass, state.share_classes.len()),
        (RegisterKind::BeneficialOwner, state.beneficial_owners.len()),
        (RegisterKind::Charge, state.charges.len()),
        (RegisterKind::Meeting, state.meetings.len()),
        (RegisterKind::BoardMinute, state.board_minutes.len()),
    ];
    for (kind, count) in counts {
        records.with_label_values(&[kind.as_str()]).set(count as f64);
    }

    metrics
        .activity_entries_total()
        .set(state.activity.len() as f64);
    metrics.staged_imports_total().set(
        (state.shareholder_staging.len()
            + state.director_staging.len()
            + state.allotment_staging.len()) as f64,
    );

    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the application is ready to serve traffic.
///
/// Checks:
/// - In-memory stores are accessible (locks acquirable).
/// - Database connection is healthy (when configured).
///
/// Returns 200 "ready" or 503 with a diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // Verify stores are accessible (read lock acquirable).
    let _ = state.companies.len();
    let _ = state.allotments.len();
    let _ = state.activity.len();

    // Verify database connection (when configured).
    if let Some(pool) = &state.db_pool {
        if let Err(e) = sqlx::query("SELECT 1").execute(pool).await {
            tracing::warn!("database health check failed: {e}");
            return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
        }
    }

    (StatusCode::OK, "ready").into_response()
}
