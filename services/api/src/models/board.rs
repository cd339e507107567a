//! Board models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Board entity
///
/// `owner` is set at creation and never reassigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Board {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "user")]
    #[sqlx(rename = "user_id")]
    pub owner: Uuid,
    pub title: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// New board creation payload
#[derive(Debug, Clone)]
pub struct NewBoard {
    pub owner: Uuid,
    pub title: String,
}

/// Request for board creation
#[derive(Debug, Deserialize)]
pub struct CreateBoardRequest {
    pub title: Option<String>,
}

/// Request for board update
///
/// Only the title is mutable; any other field in the body is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBoardRequest {
    pub title: Option<String>,
}
