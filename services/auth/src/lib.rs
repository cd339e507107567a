//! Authentication for the TaskMaster application
//!
//! This crate owns the credential store, password hashing, JWT issuance and
//! verification, and the authorization guard that protects every board and
//! todo route. The API service nests [`routes::create_router`] under
//! `/api/auth` and layers [`middleware::auth_middleware`] over its own
//! protected routes.

use std::sync::Arc;

pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod rate_limiter;
pub mod repositories;
pub mod routes;
pub mod validation;

use crate::{jwt::JwtService, rate_limiter::RateLimiter, repositories::UserRepository};

/// State shared by the authentication routes and the guard
#[derive(Clone)]
pub struct AuthState {
    pub users: Arc<dyn UserRepository>,
    pub jwt_service: JwtService,
    pub rate_limiter: RateLimiter,
}

impl AuthState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        jwt_service: JwtService,
        rate_limiter: RateLimiter,
    ) -> Self {
        Self {
            users,
            jwt_service,
            rate_limiter,
        }
    }
}
