//! Application state shared across handlers

use std::sync::Arc;

use auth::{
    AuthState,
    jwt::JwtService,
    rate_limiter::RateLimiter,
    repositories::{MemoryUserRepository, PgUserRepository},
};
use sqlx::PgPool;

use crate::{
    repositories::{MemoryStore, PgBoardRepository, PgTodoRepository},
    services::{BoardService, TodoService},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Present only with the PostgreSQL backend
    pub db_pool: Option<PgPool>,
    pub auth: AuthState,
    pub board_service: BoardService,
    pub todo_service: TodoService,
}

impl AppState {
    /// State backed by PostgreSQL
    pub fn postgres(pool: PgPool, jwt_service: JwtService, rate_limiter: RateLimiter) -> Self {
        let boards = Arc::new(PgBoardRepository::new(pool.clone()));
        let todos = Arc::new(PgTodoRepository::new(pool.clone()));

        Self {
            auth: AuthState::new(
                Arc::new(PgUserRepository::new(pool.clone())),
                jwt_service,
                rate_limiter,
            ),
            board_service: BoardService::new(boards.clone()),
            todo_service: TodoService::new(boards, todos),
            db_pool: Some(pool),
        }
    }

    /// State backed by process memory
    pub fn in_memory(jwt_service: JwtService, rate_limiter: RateLimiter) -> Self {
        let store = Arc::new(MemoryStore::new());

        Self {
            db_pool: None,
            auth: AuthState::new(
                Arc::new(MemoryUserRepository::new()),
                jwt_service,
                rate_limiter,
            ),
            board_service: BoardService::new(store.clone()),
            todo_service: TodoService::new(store.clone(), store),
        }
    }
}
