//! PostgreSQL board repository

use async_trait::async_trait;
use chrono::Utc;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::BoardRepository;
use crate::models::{Board, NewBoard};

/// Board repository backed by the `boards` table
#[derive(Clone)]
pub struct PgBoardRepository {
    pool: PgPool,
}

impl PgBoardRepository {
    /// Create a new board repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardRepository for PgBoardRepository {
    async fn list_by_owner(&self, owner: Uuid) -> DatabaseResult<Vec<Board>> {
        sqlx::query_as::<_, Board>(
            r#"
            SELECT id, user_id, title, created_at
            FROM boards
            WHERE user_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Board>> {
        sqlx::query_as::<_, Board>(
            r#"
            SELECT id, user_id, title, created_at
            FROM boards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    async fn create(&self, new_board: &NewBoard) -> DatabaseResult<Board> {
        sqlx::query_as::<_, Board>(
            r#"
            INSERT INTO boards (id, user_id, title, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_board.owner)
        .bind(&new_board.title)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::from_query)
    }

    async fn update_title(&self, id: Uuid, title: &str) -> DatabaseResult<Option<Board>> {
        sqlx::query_as::<_, Board>(
            r#"
            UPDATE boards
            SET title = $2
            WHERE id = $1
            RETURNING id, user_id, title, created_at
            "#,
        )
        .bind(id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }

    async fn delete(&self, id: Uuid) -> DatabaseResult<bool> {
        // todos.board_id is ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }
}
