//! Todo handlers

use auth::models::CurrentUser;
use axum::{
    Extension, Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CreateTodoRequest, DeletedResponse, TodoPatch},
    state::AppState,
};

/// List the todos of one of the caller's boards
pub async fn list_todos_for_board(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    board_id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(board_id) = board_id?;

    let todos = state
        .todo_service
        .list_todos_for_board(user.id, board_id)
        .await?;

    Ok(Json(todos))
}

/// List every todo on the caller's boards
pub async fn list_todos_for_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let todos = state.todo_service.list_todos_for_user(user.id).await?;

    Ok(Json(todos))
}

pub async fn create_todo(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let todo = state.todo_service.create_todo(user.id, payload).await?;

    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    let todo = state.todo_service.update_todo(user.id, id, payload).await?;

    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;

    let id = state.todo_service.delete_todo(user.id, id).await?;

    Ok(Json(DeletedResponse { id }))
}
