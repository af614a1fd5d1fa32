//! # Store Module
//!
//! Persistence layer for user records. The core talks to a `UserStore`
//! trait; `SqliteUserStore` is the production implementation. The store is
//! the identifier authority: it generates ids on insert, callers re-read
//! to observe them.

pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::models::User;

pub use sqlite::SqliteUserStore;

/// Which unique constraint an insert collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
    Email,
    Username,
}

/// Store-level failures, split so the resolver can tell a uniqueness
/// collision (client error or race to recover from) apart from the
/// database being unreachable (infrastructure error).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated on {0:?}")]
    Duplicate(DuplicateField),
    #[error("no matching record")]
    NotFound,
    #[error("store unavailable: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Fields for a user insert; the store fills in id and timestamps
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub picture: Option<String>,
}

/// Persistence operations for user records
///
/// Implementations must enforce email and username uniqueness at the
/// storage layer (unique index or equivalent) so concurrent duplicate
/// creates fail with `StoreError::Duplicate` instead of inserting twice.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<(), StoreError>;
    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;
    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn update_password(&self, email: &str, password_hash: &str) -> Result<(), StoreError>;
}
