//! Board operations

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::ownership::owned_board;
use crate::{
    error::{ApiError, ApiResult},
    models::{Board, NewBoard, UpdateBoardRequest},
    repositories::BoardRepository,
};

/// Board operations for an authenticated user
#[derive(Clone)]
pub struct BoardService {
    boards: Arc<dyn BoardRepository>,
}

impl BoardService {
    pub fn new(boards: Arc<dyn BoardRepository>) -> Self {
        Self { boards }
    }

    /// All boards owned by `user`, in creation order
    pub async fn list_boards(&self, user: Uuid) -> ApiResult<Vec<Board>> {
        Ok(self.boards.list_by_owner(user).await?)
    }

    /// Create a board owned by `user`
    pub async fn create_board(&self, user: Uuid, title: Option<String>) -> ApiResult<Board> {
        let title = required_title(title)?;

        let board = self
            .boards
            .create(&NewBoard { owner: user, title })
            .await?;

        info!("User {} created board {}", user, board.id);
        Ok(board)
    }

    /// Rename a board; the owner and timestamps are never touched
    pub async fn update_board(
        &self,
        user: Uuid,
        board_id: Uuid,
        patch: UpdateBoardRequest,
    ) -> ApiResult<Board> {
        let board = owned_board(self.boards.as_ref(), user, board_id).await?;

        let Some(title) = patch.title else {
            return Ok(board);
        };
        let title = required_title(Some(title))?;

        self.boards
            .update_title(board_id, &title)
            .await?
            .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))
    }

    /// Delete a board and, with it, all of its todos
    pub async fn delete_board(&self, user: Uuid, board_id: Uuid) -> ApiResult<Uuid> {
        owned_board(self.boards.as_ref(), user, board_id).await?;

        if !self.boards.delete(board_id).await? {
            return Err(ApiError::NotFound("Board not found".to_string()));
        }

        info!("User {} deleted board {}", user, board_id);
        Ok(board_id)
    }
}

/// Titles are stored as given but must contain something besides whitespace
fn required_title(title: Option<String>) -> ApiResult<String> {
    match title {
        Some(title) if !title.trim().is_empty() => Ok(title),
        _ => Err(ApiError::Validation("Please add a title".to_string())),
    }
}
