//! Board handlers

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
    models::{CreateBoardRequest, DeletedResponse, UpdateBoardRequest},
    state::AppState,
};

/// List the caller's boards
pub async fn list_boards(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let boards = state.board_service.list_boards(user.id).await?;

    Ok(Json(boards))
}

/// Create a board owned by the caller
pub async fn create_board(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Result<Json<CreateBoardRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;

    let board = state
        .board_service
        .create_board(user.id, payload.title)
        .await?;

    Ok((StatusCode::CREATED, Json(board)))
}

/// Rename one of the caller's boards
pub async fn update_board(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateBoardRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;
    let Json(payload) = payload?;

    let board = state
        .board_service
        .update_board(user.id, id, payload)
        .await?;

    Ok(Json(board))
}

/// Delete one of the caller's boards together with its todos
pub async fn delete_board(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id?;

    let id = state.board_service.delete_board(user.id, id).await?;

    Ok(Json(DeletedResponse { id }))
}
