//! Application setup and initialization
//!
//! All initialization logic lives here instead of main.rs: configuration
//! validation, tracing, database, storage, services, and routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;
use ideaport_core::Config;
use ideaport_services::ClamAvScanner;
use ideaport_worker::TaskQueue;

/// Initialize structured logging. Respects RUST_LOG; defaults to info.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Initialize the entire application.
///
/// Returns the shared state, the router, and the worker queue handle. The
/// caller must keep the worker handle alive; dropping it shuts the pool down.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router, TaskQueue)> {
    config.validate().context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;

    let object_storage = storage::setup_storage(&config)?;

    let scanner = Arc::new(ClamAvScanner::with_timeout(
        config.clamav_host.clone(),
        config.clamav_port,
        config.clamav_timeout_secs,
    ));

    let state = services::initialize_services(&config, pool.clone(), object_storage, scanner);

    let worker = services::start_worker(&config, &state, pool);

    crate::services::retention::spawn_retention_sweep(state.clone());

    let router = routes::setup_routes(&config, state.clone());

    Ok((state, router, worker))
}
