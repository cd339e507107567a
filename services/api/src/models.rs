//! API models for request and response payloads

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

pub mod board;
pub mod todo;

pub use board::{Board, CreateBoardRequest, NewBoard, UpdateBoardRequest};
pub use todo::{BoardSummary, CreateTodoRequest, NewTodo, Todo, TodoPatch, TodoStatus, UserTodo};

/// Response for delete operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeletedResponse {
    pub id: Uuid,
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
///
/// Use together with `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
