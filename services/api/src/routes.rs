//! API service routes

use auth::middleware::auth_middleware;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
};
use serde_json::json;
use tracing::warn;

use crate::state::AppState;

pub mod boards;
pub mod todos;

/// Create the router for the API service
///
/// `/api/auth` is public; every board and todo route sits behind the
/// authorization guard.
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/boards", get(boards::list_boards).post(boards::create_board))
        .route(
            "/boards/:id",
            put(boards::update_board).delete(boards::delete_board),
        )
        .route("/todos", post(todos::create_todo))
        .route("/todos/user", get(todos::list_todos_for_user))
        .route("/todos/board/:board_id", get(todos::list_todos_for_board))
        .route(
            "/todos/:id",
            put(todos::update_todo).delete(todos::delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/auth", auth::routes::create_router(state.auth.clone()))
        .nest("/api", protected_routes)
        .with_state(state)
}

/// Liveness banner
pub async fn root() -> &'static str {
    "API is running..."
}

/// Health check endpoint
///
/// Reports 503 when the database cannot be reached.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let Some(pool) = &state.db_pool else {
        return (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "taskmaster-api",
                "storage": "memory"
            })),
        );
    };

    match common::database::health_check(pool).await {
        Ok(true) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "taskmaster-api",
                "storage": "postgres"
            })),
        ),
        Ok(false) | Err(_) => {
            warn!("Health check failed: database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "service": "taskmaster-api",
                    "storage": "postgres"
                })),
            )
        }
    }
}
