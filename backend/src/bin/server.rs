//! TSO schedule workbench HTTP server.
//!
//! Builds the schedule repository, hydrates the store, starts the display
//! clock and serves the JSON API.
//!
//! # Usage
//!
//! ```bash
//! # File-backed store (default), path from repository.toml or the environment
//! cargo run --bin tso-server
//!
//! # In-memory store
//! REPOSITORY_TYPE=local cargo run --bin tso-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: `file` or `local`, used when no `repository.toml` exists
//! - `SCHEDULE_STORE_PATH`: Store file path (default: tso-schedules.json)
//! - `RUST_LOG`: Log filter (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tso_schedule::db::{RepositoryFactory, ScheduleRepository};
use tso_schedule::http::{create_router, AppState};
use tso_schedule::services::StaticReferenceData;

fn build_repository() -> anyhow::Result<Arc<dyn ScheduleRepository>> {
    match RepositoryFactory::from_default_config() {
        Ok(repository) => {
            info!("Using repository configuration from repository.toml");
            Ok(repository)
        }
        Err(e) => {
            warn!("{}, falling back to environment", e);
            RepositoryFactory::from_env().context("failed to configure repository from environment")
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting TSO schedule server");

    let repository = build_repository()?;
    info!("Repository initialized at {}", repository.location());

    let state = AppState::new(repository, &StaticReferenceData).await;
    let _clock = state.spawn_clock();

    let app = create_router(state);

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", host, port))?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
