//! PostgreSQL todo repository

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use uuid::Uuid;

use super::TodoRepository;
use crate::models::{NewTodo, Todo, TodoPatch, TodoStatus};

const TODO_COLUMNS: &str = "id, board_id, title, description, status, due_date, created_at";

/// Todo repository backed by the `todos` table
#[derive(Clone)]
pub struct PgTodoRepository {
    pool: PgPool,
}

impl PgTodoRepository {
    /// Create a new todo repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn todo_from_row(row: PgRow) -> Result<Todo, sqlx::Error> {
    let status: String = row.try_get("status")?;
    let status = status
        .parse::<TodoStatus>()
        .map_err(|e| sqlx::Error::Decode(e.into()))?;

    Ok(Todo {
        id: row.try_get("id")?,
        board: row.try_get("board_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        status,
        due_date: row.try_get("due_date")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl TodoRepository for PgTodoRepository {
    async fn list_by_board(&self, board: Uuid) -> DatabaseResult<Vec<Todo>> {
        let query = format!(
            "SELECT {} FROM todos WHERE board_id = $1 ORDER BY created_at, id",
            TODO_COLUMNS
        );

        sqlx::query(&query)
            .bind(board)
            .try_map(todo_from_row)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn list_by_boards(&self, boards: &[Uuid]) -> DatabaseResult<Vec<Todo>> {
        if boards.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            "SELECT {} FROM todos WHERE board_id = ANY($1) ORDER BY created_at, id",
            TODO_COLUMNS
        );

        sqlx::query(&query)
            .bind(boards)
            .try_map(todo_from_row)
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Todo>> {
        let query = format!("SELECT {} FROM todos WHERE id = $1", TODO_COLUMNS);

        sqlx::query(&query)
            .bind(id)
            .try_map(todo_from_row)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn create(&self, new_todo: &NewTodo) -> DatabaseResult<Todo> {
        let query = format!(
            r#"
            INSERT INTO todos (id, board_id, title, description, status, due_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            TODO_COLUMNS
        );

        sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(new_todo.board)
            .bind(&new_todo.title)
            .bind(&new_todo.description)
            .bind(new_todo.status.as_str())
            .bind(new_todo.due_date)
            .bind(Utc::now())
            .try_map(todo_from_row)
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::from_query)
    }

    async fn update(&self, id: Uuid, patch: &TodoPatch) -> DatabaseResult<Option<Todo>> {
        // $3/$6 say whether the nullable columns are part of the patch at all
        let query = format!(
            r#"
            UPDATE todos
            SET title = COALESCE($2, title),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                status = COALESCE($5, status),
                due_date = CASE WHEN $6 THEN $7 ELSE due_date END
            WHERE id = $1
            RETURNING {}
            "#,
            TODO_COLUMNS
        );

        sqlx::query(&query)
            .bind(id)
            .bind(patch.title.as_deref())
            .bind(patch.description.is_some())
            .bind(patch.description.clone().flatten())
            .bind(patch.status.map(|s| s.as_str()))
            .bind(patch.due_date.is_some())
            .bind(patch.due_date.flatten())
            .try_map(todo_from_row)
            .fetch_optional(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
