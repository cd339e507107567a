//! Todo models

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::double_option;

/// Todo status
///
/// Any status may move to any other; there is no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Pending => "pending",
            TodoStatus::InProgress => "in-progress",
            TodoStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TodoStatus::Pending),
            "in-progress" => Ok(TodoStatus::InProgress),
            "completed" => Ok(TodoStatus::Completed),
            other => Err(format!("Unknown todo status: {}", other)),
        }
    }
}

/// Todo entity
///
/// Carries no user reference: its owner is the owner of `board`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub board: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// New todo creation payload, already validated
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub board: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub due_date: Option<DateTime<Utc>>,
}

/// Request for todo creation
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub board_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Partial todo update
///
/// `description` and `dueDate` distinguish "absent" (keep) from `null`
/// (clear). The board reference cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoPatch {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    pub status: Option<TodoStatus>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
}

impl TodoPatch {
    /// Apply the patch in place
    pub fn apply(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
    }
}

/// Parent board reference embedded in [`UserTodo`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSummary {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
}

/// A todo from the user-wide listing, with its board's title attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTodo {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub board: BoardSummary,
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserTodo {
    pub fn new(todo: Todo, board_title: String) -> Self {
        Self {
            id: todo.id,
            board: BoardSummary {
                id: todo.board,
                title: board_title,
            },
            title: todo.title,
            description: todo.description,
            status: todo.status,
            due_date: todo.due_date,
            created_at: todo.created_at,
        }
    }
}
