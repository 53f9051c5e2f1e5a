//! # Database Persistence Layer
//!
//! Optional Postgres persistence via SQLx. When `DATABASE_URL` is set,
//! companies and register records are written through on mutation and
//! activity entries are appended best-effort; everything is loaded back
//! into the in-memory stores on boot. When absent, the API operates in
//! in-memory-only mode (suitable for development and testing).
//!
//! Register records persist as one JSONB row per record, keyed by id and
//! tagged with their register kind — the aggregate children (a meeting's
//! resolutions, a minute's action items) ride inside the payload, so the
//! row write is the transactional boundary.

pub mod activities;
pub mod companies;
pub mod registers;

use sqlx::postgres::{PgPool, PgPoolOptions};

use statreg_registers::{
    Allotment, BeneficialOwner, BoardMinute, Charge, Director, Meeting, ShareClass, Shareholder,
};

use crate::state::AppState;

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if `DATABASE_URL` is not set (in-memory-only mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool() -> Result<Option<PgPool>, sqlx::Error> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            tracing::warn!(
                "DATABASE_URL not set — running in-memory only mode. \
                 State will not survive restarts."
            );
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(Some(pool))
}

/// Load all persisted state back into the in-memory stores on boot.
pub async fn load_state(pool: &PgPool, state: &AppState) -> Result<(), sqlx::Error> {
    let companies = companies::load_all(pool, &state.companies).await?;
    let mut records = 0usize;
    records += registers::load_all::<Allotment>(pool, &state.allotments).await?;
    records += registers::load_all::<Shareholder>(pool, &state.shareholders).await?;
    records += registers::load_all::<Director>(pool, &state.directors).await?;
    records += registers::load_all::<ShareClass>(pool, &state.share_classes).await?;
    records += registers::load_all::<BeneficialOwner>(pool, &state.beneficial_owners).await?;
    records += registers::load_all::<Charge>(pool, &state.charges).await?;
    records += registers::load_all::<Meeting>(pool, &state.meetings).await?;
    records += registers::load_all::<BoardMinute>(pool, &state.board_minutes).await?;
    let activities = activities::load_all(pool, &state.activity).await?;

    tracing::info!(
        companies,
        records,
        activities,
        "loaded persisted state into memory"
    );
    Ok(())
}
