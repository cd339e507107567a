//! Server configuration
//!
//! Read from the process environment (after `.env` has been loaded):
//! - `PORT`: listening port (default 5000)
//! - `FRONTEND_URL`: comma-separated list of origins allowed by CORS
//!   (default `http://localhost:3000`)
//! - `STORAGE_BACKEND`: `postgres` (default) or `memory`, in any case

use std::str::FromStr;

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use config::{Config, Environment};
use serde::{Deserialize, Deserializer, de};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Where boards, todos and users are kept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Postgres,
    /// Process memory; everything is lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(format!(
                "unknown storage backend `{}`, expected `postgres` or `memory`",
                value
            )),
        }
    }
}

impl<'de> Deserialize<'de> for StorageBackend {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub frontend_url: String,
    pub storage_backend: StorageBackend,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            frontend_url: "http://localhost:3000".to_string(),
            storage_backend: StorageBackend::default(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Config::builder()
            .add_source(Environment::default().try_parsing(true))
            .build()
            .and_then(Config::try_deserialize::<Self>)
            .context("Invalid server configuration")
    }

    /// Origins listed in `FRONTEND_URL`, trimmed, empty entries dropped
    pub fn allowed_origins(&self) -> Vec<String> {
        self.frontend_url
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn cors_layer(&self) -> Result<CorsLayer> {
        let origins = self
            .allowed_origins()
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("Invalid CORS origin: {}", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]))
    }
}
