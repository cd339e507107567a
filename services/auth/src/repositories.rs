//! Credential store: persistence for user identity records

use async_trait::async_trait;
use common::error::DatabaseResult;
use uuid::Uuid;

use crate::models::{NewUser, User};

pub mod memory;
pub mod user;

pub use memory::MemoryUserRepository;
pub use user::PgUserRepository;

/// Storage contract for users
///
/// Emails are expected to be normalized by the caller. Implementations
/// report a duplicate email as [`common::error::DatabaseError::Conflict`].
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn create(&self, new_user: &NewUser) -> DatabaseResult<User>;

    /// Find a user by email
    async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<User>>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<User>>;
}
