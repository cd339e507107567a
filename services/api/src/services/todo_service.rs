//! Todo operations

use std::{collections::HashMap, sync::Arc};

use tracing::info;
use uuid::Uuid;

use super::ownership::{owned_board, owned_todo};
use crate::{
    error::{ApiError, ApiResult},
    models::{CreateTodoRequest, NewTodo, Todo, TodoPatch, UserTodo},
    repositories::{BoardRepository, TodoRepository},
};

/// Todo operations for an authenticated user
#[derive(Clone)]
pub struct TodoService {
    boards: Arc<dyn BoardRepository>,
    todos: Arc<dyn TodoRepository>,
}

impl TodoService {
    pub fn new(boards: Arc<dyn BoardRepository>, todos: Arc<dyn TodoRepository>) -> Self {
        Self { boards, todos }
    }

    /// All todos of one of `user`'s boards
    pub async fn list_todos_for_board(&self, user: Uuid, board_id: Uuid) -> ApiResult<Vec<Todo>> {
        owned_board(self.boards.as_ref(), user, board_id).await?;
        Ok(self.todos.list_by_board(board_id).await?)
    }

    /// All todos across `user`'s boards, each carrying its board's title
    pub async fn list_todos_for_user(&self, user: Uuid) -> ApiResult<Vec<UserTodo>> {
        let boards = self.boards.list_by_owner(user).await?;
        if boards.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = boards.iter().map(|b| b.id).collect();
        let titles: HashMap<Uuid, String> = boards.into_iter().map(|b| (b.id, b.title)).collect();

        let todos = self.todos.list_by_boards(&ids).await?;

        Ok(todos
            .into_iter()
            .map(|todo| {
                let title = titles.get(&todo.board).cloned().unwrap_or_default();
                UserTodo::new(todo, title)
            })
            .collect())
    }

    /// Create a todo on one of `user`'s boards
    pub async fn create_todo(&self, user: Uuid, request: CreateTodoRequest) -> ApiResult<Todo> {
        let (Some(board_id), Some(title)) = (request.board_id, request.title) else {
            return Err(missing_fields());
        };
        if title.trim().is_empty() {
            return Err(missing_fields());
        }

        let board_id: Uuid = board_id
            .trim()
            .parse()
            .map_err(|_| ApiError::Validation("Invalid board id".to_string()))?;

        owned_board(self.boards.as_ref(), user, board_id).await?;

        let todo = self
            .todos
            .create(&NewTodo {
                board: board_id,
                title,
                description: request.description,
                status: request.status.unwrap_or_default(),
                due_date: request.due_date,
            })
            .await?;

        info!("User {} created todo {} on board {}", user, todo.id, board_id);
        Ok(todo)
    }

    /// Apply a partial update to one of `user`'s todos
    pub async fn update_todo(&self, user: Uuid, todo_id: Uuid, patch: TodoPatch) -> ApiResult<Todo> {
        owned_todo(self.boards.as_ref(), self.todos.as_ref(), user, todo_id).await?;

        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ApiError::Validation("Title cannot be empty".to_string()));
        }

        self.todos
            .update(todo_id, &patch)
            .await?
            .ok_or_else(|| ApiError::NotFound("Todo not found".to_string()))
    }

    /// Delete one of `user`'s todos
    pub async fn delete_todo(&self, user: Uuid, todo_id: Uuid) -> ApiResult<Uuid> {
        owned_todo(self.boards.as_ref(), self.todos.as_ref(), user, todo_id).await?;

        if !self.todos.delete(todo_id).await? {
            return Err(ApiError::NotFound("Todo not found".to_string()));
        }

        info!("User {} deleted todo {}", user, todo_id);
        Ok(todo_id)
    }
}

fn missing_fields() -> ApiError {
    ApiError::Validation("Please add boardId and title".to_string())
}
