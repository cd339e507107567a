//! Ownership-chain checks

use tracing::warn;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{Board, Todo},
    repositories::{BoardRepository, TodoRepository},
};

/// Load a board and check that `user` owns it
pub async fn owned_board(
    boards: &dyn BoardRepository,
    user: Uuid,
    board_id: Uuid,
) -> ApiResult<Board> {
    let board = boards
        .find_by_id(board_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    if board.owner != user {
        warn!("User {} denied access to board {}", user, board_id);
        return Err(ApiError::Forbidden);
    }

    Ok(board)
}

/// Load a todo and check that `user` owns its board
pub async fn owned_todo(
    boards: &dyn BoardRepository,
    todos: &dyn TodoRepository,
    user: Uuid,
    todo_id: Uuid,
) -> ApiResult<Todo> {
    let todo = todos
        .find_by_id(todo_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))?;

    let Some(board) = boards.find_by_id(todo.board).await? else {
        warn!("Todo {} references missing board {}", todo.id, todo.board);
        return Err(ApiError::NotFound("Todo not found".to_string()));
    };

    if board.owner != user {
        warn!("User {} denied access to todo {}", user, todo_id);
        return Err(ApiError::Forbidden);
    }

    Ok(todo)
}
