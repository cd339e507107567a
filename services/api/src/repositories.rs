//! Repositories for board and todo persistence
//!
//! The traits are the storage contract; ownership rules live one layer up in
//! [`crate::services`]. Two implementations exist: PostgreSQL and an
//! in-memory store.

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{Board, NewBoard, NewTodo, Todo, TodoPatch};

pub mod board;
pub mod memory;
pub mod todo;

pub use board::PgBoardRepository;
pub use memory::MemoryStore;
pub use todo::PgTodoRepository;

/// Storage contract for boards
#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// All boards owned by a user, in creation order
    async fn list_by_owner(&self, owner: Uuid) -> DatabaseResult<Vec<Board>>;

    /// Find a board by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Board>>;

    /// Insert a new board with a server-assigned timestamp
    async fn create(&self, new_board: &NewBoard) -> DatabaseResult<Board>;

    /// Replace a board's title, returning `None` if it does not exist
    async fn update_title(&self, id: Uuid, title: &str) -> DatabaseResult<Option<Board>>;

    /// Delete a board together with its todos, returning whether it existed
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}

/// Storage contract for todos
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// All todos of a board, in creation order
    async fn list_by_board(&self, board: Uuid) -> DatabaseResult<Vec<Todo>>;

    /// All todos belonging to any of the given boards, in creation order
    async fn list_by_boards(&self, boards: &[Uuid]) -> DatabaseResult<Vec<Todo>>;

    /// Find a todo by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Todo>>;

    /// Insert a new todo with a server-assigned timestamp
    async fn create(&self, new_todo: &NewTodo) -> DatabaseResult<Todo>;

    /// Apply a patch, returning `None` if the todo does not exist
    async fn update(&self, id: Uuid, patch: &TodoPatch) -> DatabaseResult<Option<Todo>>;

    /// Delete a todo, returning whether it existed
    async fn delete(&self, id: Uuid) -> DatabaseResult<bool>;
}
