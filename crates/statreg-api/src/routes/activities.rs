//! # Activity Log Routes
//!
//! Read-only query surface over the append-only activity log: filtered,
//! paginated listings per company plus an aggregate statistics view.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use statreg_activity::{ActivityFilter, ActivityKind, ActivityRecord, ActivityStats, Page};
use statreg_authz::Permission;
use statreg_core::{CompanyId, RecordId, RegisterKind, Timestamp};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::routes::require;
use crate::state::AppState;

/// Query parameters for the activity listing. Filters arrive as wire
/// strings and are parsed here, so a bad value is a 422 naming the
/// parameter rather than a silent empty result.
#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    /// Register kind tag (e.g. `allotment`, `share_class`).
    pub register: Option<String>,
    /// Record the entries must reference.
    pub record_id: Option<Uuid>,
    /// Activity kind tag (e.g. `added`, `status_changed`).
    pub kind: Option<String>,
    /// Entries recorded at or after this instant.
    pub from: Option<String>,
    /// Entries recorded at or before this instant.
    pub to: Option<String>,
    /// Maximum entries to return (default 100, max 1000).
    pub limit: Option<usize>,
    /// Entries to skip (default 0).
    pub offset: Option<usize>,
}

impl ActivityQuery {
    fn into_filter(self) -> Result<(ActivityFilter, Page), AppError> {
        let register = self
            .register
            .map(|raw| {
                serde_json::from_value::<RegisterKind>(serde_json::Value::String(raw.clone()))
                    .map_err(|_| {
                        AppError::Validation(format!("unknown register kind {raw:?}"))
                    })
            })
            .transpose()?;

        let kind = self
            .kind
            .map(|raw| {
                serde_json::from_value::<ActivityKind>(serde_json::Value::String(raw.clone()))
                    .map_err(|_| AppError::Validation(format!("unknown activity kind {raw:?}")))
            })
            .transpose()?;

        let from = self
            .from
            .map(|raw| {
                Timestamp::parse(&raw)
                    .map_err(|_| AppError::Validation(format!("invalid 'from' date {raw:?}")))
            })
            .transpose()?;

        let to = self
            .to
            .map(|raw| {
                Timestamp::parse(&raw)
                    .map_err(|_| AppError::Validation(format!("invalid 'to' date {raw:?}")))
            })
            .transpose()?;

        Ok((
            ActivityFilter {
                register,
                record_id: self.record_id.map(RecordId),
                kind,
                from,
                to,
            },
            Page {
                limit: self.limit,
                offset: self.offset,
            },
        ))
    }
}

/// Build the activities router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/companies/:company_id/activities", get(list_activities))
        .route(
            "/v1/companies/:company_id/activities/stats",
            get(activity_stats),
        )
}

/// GET /v1/companies/:company_id/activities — List activity entries,
/// newest first.
#[utoipa::path(
    get,
    path = "/v1/companies/{company_id}/activities",
    params(
        ("company_id" = String, Path, description = "Company ID"),
        ("register" = Option<String>, Query, description = "Register kind tag"),
        ("record_id" = Option<String>, Query, description = "Referenced record ID"),
        ("kind" = Option<String>, Query, description = "Activity kind tag"),
        ("from" = Option<String>, Query, description = "Earliest instant (inclusive)"),
        ("to" = Option<String>, Query, description = "Latest instant (inclusive)"),
        ("limit" = Option<usize>, Query, description = "Max entries (default 100, max 1000)"),
        ("offset" = Option<usize>, Query, description = "Entries to skip"),
    ),
    responses(
        (status = 200, description = "Matching activity entries, newest first"),
        (status = 404, description = "Company not found", body = crate::error::ErrorBody),
    ),
    tag = "activities"
)]
pub(crate) async fn list_activities(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ActivityQuery>,
) -> Result<Json<Vec<ActivityRecord>>, AppError> {
    require(&state, &user, Permission::ActivityRead, company_id)?;
    let (filter, page) = query.into_filter()?;
    Ok(Json(state.activity.query(company_id, &filter, page)))
}

/// GET /v1/companies/:company_id/activities/stats — Aggregate counts by
/// kind, register, actor, and month.
#[utoipa::path(
    get,
    path = "/v1/companies/{company_id}/activities/stats",
    params(("company_id" = String, Path, description = "Company ID")),
    responses(
        (status = 200, description = "Aggregate activity statistics"),
        (status = 404, description = "Company not found", body = crate::error::ErrorBody),
    ),
    tag = "activities"
)]
pub(crate) async fn activity_stats(
    State(state): State<AppState>,
    Path(company_id): Path<CompanyId>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<ActivityStats>, AppError> {
    require(&state, &user, Permission::ActivityRead, company_id)?;
    Ok(Json(state.activity.stats(company_id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_parses_tags_and_dates() {
        let query = ActivityQuery {
            register: Some("share_class".into()),
            kind: Some("status_changed".into()),
            from: Some("2025-01-01".into()),
            to: Some("2025-12-31T23:59:59Z".into()),
            ..Default::default()
        };
        let (filter, _) = query.into_filter().unwrap();
        assert_eq!(filter.register, Some(RegisterKind::ShareClass));
        assert_eq!(filter.kind, Some(ActivityKind::StatusChanged));
        assert!(filter.from.unwrap() < filter.to.unwrap());
    }

    #[test]
    fn test_query_rejects_unknown_tags() {
        let query = ActivityQuery {
            register: Some("invoices".into()),
            ..Default::default()
        };
        assert!(matches!(
            query.into_filter(),
            Err(AppError::Validation(_))
        ));

        let query = ActivityQuery {
            kind: Some("exploded".into()),
            ..Default::default()
        };
        assert!(query.into_filter().is_err());

        let query = ActivityQuery {
            from: Some("yesterday".into()),
            ..Default::default()
        };
        assert!(query.into_filter().is_err());
    }
}
