//! # statreg-api server entry point
//!
//! Parses command-line arguments, initializes tracing and the optional
//! database pool, loads persisted state, and serves the API.

use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use statreg_api::state::{AppConfig, AppState};

/// Statutory register administration API.
#[derive(Parser, Debug)]
#[command(name = "statreg-api", version, about, long_about = None)]
struct Cli {
    /// Address to bind, e.g. 0.0.0.0:8080.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level, honouring RUST_LOG
    // when set.
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = AppConfig {
        auth_token: std::env::var("STATREG_AUTH_TOKEN").ok(),
    };
    if config.auth_token.is_none() {
        tracing::warn!("STATREG_AUTH_TOKEN not set — running in open (development) mode");
    }

    let pool = statreg_api::db::init_pool()
        .await
        .context("database initialization failed")?;

    let state = AppState::with_config(config, pool);
    if let Some(pool) = state.db_pool.clone() {
        statreg_api::db::load_state(&pool, &state)
            .await
            .context("loading persisted state failed")?;
    }

    let app = statreg_api::app(state);
    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    tracing::info!(bind = %cli.bind, "statreg-api listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
