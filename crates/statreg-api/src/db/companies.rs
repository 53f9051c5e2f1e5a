//! Company persistence.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use statreg_core::{CompanyId, Timestamp};

use crate::state::{Company, CompanyStore};

/// Insert or update one company.
pub async fn save(pool: &PgPool, company: &Company) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO companies (id, name, jurisdiction, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (id) DO UPDATE SET name = $2, jurisdiction = $3, updated_at = $5",
    )
    .bind(*company.id.as_uuid())
    .bind(&company.name)
    .bind(&company.jurisdiction)
    .bind(*company.created_at.as_datetime())
    .bind(*company.updated_at.as_datetime())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete one company.
pub async fn delete(pool: &PgPool, id: CompanyId) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(*id.as_uuid())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct CompanyRow {
    id: Uuid,
    name: String,
    jurisdiction: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Load every persisted company into the in-memory store. Returns the
/// number of companies restored.
pub async fn load_all(pool: &PgPool, store: &CompanyStore) -> Result<usize, sqlx::Error> {
    let rows = sqlx::query_as::<_, CompanyRow>(
        "SELECT id, name, jurisdiction, created_at, updated_at FROM companies",
    )
    .fetch_all(pool)
    .await?;

    let count = rows.len();
    for row in rows {
        store.insert(Company {
            id: CompanyId(row.id),
            name: row.name,
            jurisdiction: row.jurisdiction,
            created_at: Timestamp::from_utc(row.created_at),
            updated_at: Timestamp::from_utc(row.updated_at),
        });
    }
    Ok(count)
}
