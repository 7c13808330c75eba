//! Application initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod services;

use axum::Router;
use std::sync::Arc;

use crewdesk_core::Config;

use crate::state::AppState;

/// Connect the database, build state, and wire up the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, Router), anyhow::Error> {
    config.validate()?;
    let pool = database::setup_database(&config).await?;
    let state = services::build_state(&config, pool)?;
    let router = routes::setup_routes(&config, state.clone()).await?;
    Ok((state, router))
}
