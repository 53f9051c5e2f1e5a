//! Activity log persistence.
//!
//! Activity writes are best-effort: the mutation they describe has
//! already committed, so a failed append is traced and dropped rather
//! than surfaced. At-most-once, never blocking.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use statreg_activity::{ActivityKind, ActivityLog, ActivityRecord};
use statreg_core::{ActivityId, CompanyId, RecordId, RegisterKind, Timestamp};

use crate::state::AppState;

/// Insert one activity entry.
pub async fn save(pool: &PgPool, entry: &ActivityRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO activities
             (id, company_id, kind, register, record_id, description, actor, recorded_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(*entry.id.as_uuid())
    .bind(*entry.company_id.as_uuid())
    .bind(entry.kind.as_str())
    .bind(entry.register.as_str())
    .bind(entry.record_id.map(|id| *id.as_uuid()))
    .bind(&entry.description)
    .bind(&entry.actor)
    .bind(*entry.recorded_at.as_datetime())
    .execute(pool)
    .await?;

    Ok(())
}

/// Drain the log's write-behind journal and persist it, best-effort.
///
/// Called after each mutation. Without a pool the drained entries are
/// dropped, keeping the journal bounded by one request cycle.
pub async fn flush(state: &AppState) {
    let pending = state.activity.take_pending();
    let Some(pool) = &state.db_pool else { return };

    for entry in pending {
        if let Err(e) = save(pool, &entry).await {
            tracing::warn!(
                activity = %entry.id,
                error = %e,
                "activity persist failed; entry remains in memory only"
            );
        }
    }
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct ActivityRow {
    id: Uuid,
    company_id: Uuid,
    kind: String,
    register: String,
    record_id: Option<Uuid>,
    description: String,
    actor: String,
    recorded_at: DateTime<Utc>,
}

impl ActivityRow {
    fn into_record(self) -> Option<ActivityRecord> {
        let kind: ActivityKind =
            serde_json::from_value(serde_json::Value::String(self.kind.clone())).ok()?;
        let register: RegisterKind =
            serde_json::from_value(serde_json::Value::String(self.register.clone())).ok()?;
        Some(ActivityRecord {
            id: ActivityId(self.id),
            company_id: CompanyId(self.company_id),
            kind,
            register,
            record_id: self.record_id.map(RecordId),
            description: self.description,
            actor: self.actor,
            recorded_at: Timestamp::from_utc(self.recorded_at),
        })
    }
}

/// Load every persisted activity entry into the in-memory log, oldest
/// first. Returns the number of entries restored.
pub async fn load_all(pool: &PgPool, log: &ActivityLog) -> Result<usize, sqlx::Error> {
    let rows = sqlx::query_as::<_, ActivityRow>(
        "SELECT id, company_id, kind, register, record_id, description, actor, recorded_at
         FROM activities ORDER BY recorded_at",
    )
    .fetch_all(pool)
    .await?;

    let mut restored = 0usize;
    for row in rows {
        let id = row.id;
        match row.into_record() {
            Some(entry) => {
                log.restore(entry);
                restored += 1;
            }
            None => {
                tracing::warn!(activity = %id, "skipping activity row with unknown tags");
            }
        }
    }
    Ok(restored)
}
