//! In-memory board and todo store
//!
//! Both tables sit behind one lock so that deleting a board and its todos is a
//! single step, matching the cascade of the PostgreSQL schema.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::error::DatabaseResult;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BoardRepository, TodoRepository};
use crate::models::{Board, NewBoard, NewTodo, Todo, TodoPatch};

#[derive(Default)]
struct Tables {
    boards: Vec<Board>,
    todos: Vec<Todo>,
}

/// Board and todo store holding records in process memory, in insertion order
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BoardRepository for MemoryStore {
    async fn list_by_owner(&self, owner: Uuid) -> DatabaseResult<Vec<Board>> {
        let tables = self.tables.read().await;
        Ok(tables
            .boards
            .iter()
            .filter(|b| b.owner == owner)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Board>> {
        let tables = self.tables.read().await;
        Ok(tables.boards.iter().find(|b| b.id == id).cloned())
    }

    async fn create(&self, new_board: &NewBoard) -> DatabaseResult<Board> {
        let board = Board {
            id: Uuid::new_v4(),
            owner: new_board.owner,
            title: new_board.title.clone(),
            created_at: Utc::now(),
        };

        self.tables.write().await.boards.push(board.clone());
        Ok(board)
    }

    async fn update_title(&self, id: Uuid, title: &str) -> DatabaseResult<Option<Board>> {
        let mut tables = self.tables.write().await;
        Ok(tables.boards.iter_mut().find(|b| b.id == id).map(|board| {
            board.title = title.to_string();
            board.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.boards.len();
        tables.boards.retain(|b| b.id != id);

        if tables.boards.len() == before {
            return Ok(false);
        }

        tables.todos.retain(|t| t.board != id);
        Ok(true)
    }
}

#[async_trait]
impl TodoRepository for MemoryStore {
    async fn list_by_board(&self, board: Uuid) -> DatabaseResult<Vec<Todo>> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .filter(|t| t.board == board)
            .cloned()
            .collect())
    }

    async fn list_by_boards(&self, boards: &[Uuid]) -> DatabaseResult<Vec<Todo>> {
        let tables = self.tables.read().await;
        Ok(tables
            .todos
            .iter()
            .filter(|t| boards.contains(&t.board))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Todo>> {
        let tables = self.tables.read().await;
        Ok(tables.todos.iter().find(|t| t.id == id).cloned())
    }

    async fn create(&self, new_todo: &NewTodo) -> DatabaseResult<Todo> {
        let todo = Todo {
            id: Uuid::new_v4(),
            board: new_todo.board,
            title: new_todo.title.clone(),
            description: new_todo.description.clone(),
            status: new_todo.status,
            due_date: new_todo.due_date,
            created_at: Utc::now(),
        };

        self.tables.write().await.todos.push(todo.clone());
        Ok(todo)
    }

    async fn update(&self, id: Uuid, patch: &TodoPatch) -> DatabaseResult<Option<Todo>> {
        let mut tables = self.tables.write().await;
        Ok(tables.todos.iter_mut().find(|t| t.id == id).map(|todo| {
            patch.apply(todo);
            todo.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.todos.len();
        tables.todos.retain(|t| t.id != id);
        Ok(tables.todos.len() != before)
    }
}
