use crate::models::{NewSearchRecord, SearchRecord, User};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("username or email already exists")]
    Conflict,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables, indexes, etc.)
    async fn init(&self) -> Result<()>;

    /// Create a new user; fails with `Conflict` if the username or email
    /// is already taken
    async fn create_user(&self, user: &User) -> StorageResult<()>;

    /// Look up a user by email
    async fn user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Look up a user by username
    async fn user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// List users (for the admin CLI)
    async fn list_users(&self, limit: i64, offset: i64) -> Result<Vec<User>>;

    /// Append one search record and return it with its assigned id
    async fn append_search(&self, record: NewSearchRecord) -> Result<SearchRecord>;

    /// All search records for a user. No ordering is guaranteed; callers
    /// sort as needed.
    async fn history_for_user(&self, user_id: &str) -> Result<Vec<SearchRecord>>;
}
