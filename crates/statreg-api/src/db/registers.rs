//! Register record persistence.
//!
//! All functions take a `&PgPool` and operate on the `register_records`
//! table. Records persist as JSONB payloads keyed by id and tagged with
//! their register kind; status machine constraints are enforced at the
//! application layer, not in SQL.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use statreg_registers::{Register, RegisterStore};

/// Insert or update one register record.
pub async fn save<R: Register>(pool: &PgPool, record: &R) -> Result<(), sqlx::Error> {
    let payload = serde_json::to_value(record)
        .map_err(|e| sqlx::Error::Protocol(format!("failed to serialize register record: {e}")))?;

    sqlx::query(
        "INSERT INTO register_records (id, company_id, kind, payload, updated_at)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (id) DO UPDATE SET payload = $4, updated_at = $5",
    )
    .bind(*record.id().as_uuid())
    .bind(*record.company_id().as_uuid())
    .bind(R::KIND.as_str())
    .bind(&payload)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete one register record.
pub async fn delete(pool: &PgPool, id: statreg_core::RecordId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM register_records WHERE id = $1")
        .bind(*id.as_uuid())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct RegisterRow {
    id: Uuid,
    payload: serde_json::Value,
}

/// Load every persisted record of one kind into its in-memory store.
/// Returns the number of records restored.
pub async fn load_all<R: Register>(
    pool: &PgPool,
    store: &RegisterStore<R>,
) -> Result<usize, sqlx::Error> {
    let rows = sqlx::query_as::<_, RegisterRow>(
        "SELECT id, payload FROM register_records WHERE kind = $1",
    )
    .bind(R::KIND.as_str())
    .fetch_all(pool)
    .await?;

    let mut restored = 0usize;
    for row in rows {
        match serde_json::from_value::<R>(row.payload) {
            Ok(record) => {
                store.restore(record);
                restored += 1;
            }
            Err(e) => {
                tracing::warn!(
                    register = %R::KIND,
                    id = %row.id,
                    error = %e,
                    "skipping register record with undecodable payload"
                );
            }
        }
    }
    Ok(restored)
}
