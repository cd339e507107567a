//! TaskMaster REST API
//!
//! Boards and todos, scoped to the authenticated user through the ownership
//! chain Todo → Board → User. Authentication itself lives in the `auth`
//! crate and is nested under `/api/auth`.

use anyhow::Result;
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;

pub use crate::{config::ServerConfig, state::AppState};

/// Assemble the full application: routes, CORS and request tracing
pub fn build_app(state: AppState, config: &ServerConfig) -> Result<Router> {
    Ok(routes::create_router(state)
        .layer(config.cors_layer()?)
        .layer(TraceLayer::new_for_http()))
}
