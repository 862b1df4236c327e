//! Planner service entry point.
//!
//! Usage: `timetabler [config.json]`. Without an argument the built-in
//! defaults apply; either way `TIMETABLER_BIND` and
//! `TIMETABLER_BACKEND_URL` override the loaded values.

mod api;
mod calendar;
mod config;
mod model;
mod planner;
mod runs;
mod server;
mod slots;
mod types;

use anyhow::Context;
use config::PlannerConfig;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use types::PlannerState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let config = match std::env::args().nth(1) {
        Some(path) => PlannerConfig::load_from_file(Path::new(&path))
            .map_err(|e| anyhow::anyhow!("Failed to load config from {path}: {e}"))?,
        None => PlannerConfig::default(),
    }
    .apply_env_overrides();

    info!(
        bind = %config.bind_address,
        backend = %config.backend_url,
        "Starting timetabler"
    );

    let state = Arc::new(PlannerState::new(config.clone())?);
    let router = server::create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
