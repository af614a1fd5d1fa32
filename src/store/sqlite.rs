//! SQLite-backed user store

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use super::{DuplicateField, NewUser, StoreError, UserStore};
use crate::auth::models::User;
use crate::common::id_generator::generate_user_id;

/// User persistence over a sqlx SQLite pool
///
/// The pool is cheap to clone and safe to share across concurrent
/// requests; uniqueness of email and username is enforced by the unique
/// indexes created in `common::migrations`.
#[derive(Clone)]
pub struct SqliteUserStore {
    pool: SqlitePool,
}

impl SqliteUserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error to `StoreError`, classifying SQLite unique-index hits
/// by the constraint named in the message ("users.email" / "users.username").
fn map_sqlx_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) {
            let message = db.message();
            if message.contains("users.username") {
                return StoreError::Duplicate(DuplicateField::Username);
            }
            return StoreError::Duplicate(DuplicateField::Email);
        }
    }
    StoreError::Backend(e)
}

#[async_trait]
impl UserStore for SqliteUserStore {
    async fn create_user(&self, user: NewUser) -> Result<(), StoreError> {
        let id = generate_user_id();
        let now = Utc::now().to_rfc3339();

        debug!(user_id = %id, "Inserting new user record");

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, role, picture, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .bind(user.picture.as_deref())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0 > 0)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE email = ?")
            .bind(password_hash)
            .bind(Utc::now().to_rfc3339())
            .bind(email)
            .execute(&self.pool)
            .await?;
        // A zero-row UPDATE means the account vanished between check and
        // write; surface it instead of reporting a write that never happened
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::migrations::run_migrations;
    use sqlx::sqlite::SqlitePoolOptions;

    // A single connection keeps every query on the same in-memory database
    async fn test_store() -> SqliteUserStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory sqlite");
        run_migrations(&pool).await.expect("migrations failed");
        SqliteUserStore::new(pool)
    }

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            role: "tester".to_string(),
            picture: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let store = test_store().await;
        store
            .create_user(new_user("alice", "a@x.com"))
            .await
            .expect("insert failed");

        let user = store
            .find_by_email("a@x.com")
            .await
            .expect("lookup failed")
            .expect("user missing");
        assert!(user.id.starts_with("U_"));
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, "tester");
        assert_eq!(user.created_at, user.updated_at);
    }

    #[tokio::test]
    async fn test_find_by_email_returns_none_when_absent() {
        let store = test_store().await;
        let user = store.find_by_email("ghost@x.com").await.expect("lookup failed");
        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_maps_to_duplicate_error() {
        let store = test_store().await;
        store.create_user(new_user("alice", "a@x.com")).await.unwrap();

        let err = store
            .create_user(new_user("bob", "a@x.com"))
            .await
            .expect_err("second insert should fail");
        assert!(matches!(err, StoreError::Duplicate(DuplicateField::Email)));
    }

    #[tokio::test]
    async fn test_duplicate_username_maps_to_duplicate_error() {
        let store = test_store().await;
        store.create_user(new_user("alice", "a@x.com")).await.unwrap();

        let err = store
            .create_user(new_user("alice", "b@x.com"))
            .await
            .expect_err("second insert should fail");
        assert!(matches!(err, StoreError::Duplicate(DuplicateField::Username)));
    }

    #[tokio::test]
    async fn test_exists_checks() {
        let store = test_store().await;
        store.create_user(new_user("alice", "a@x.com")).await.unwrap();

        assert!(store.email_exists("a@x.com").await.unwrap());
        assert!(!store.email_exists("b@x.com").await.unwrap());
        assert!(store.username_exists("alice").await.unwrap());
        assert!(!store.username_exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_password_replaces_hash_and_touches_timestamp() {
        let store = test_store().await;
        store.create_user(new_user("alice", "a@x.com")).await.unwrap();

        store
            .update_password("a@x.com", "$argon2id$fake")
            .await
            .expect("update failed");

        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(user.password_hash, "$argon2id$fake");
        assert!(user.updated_at >= user.created_at);
    }

    #[tokio::test]
    async fn test_update_password_for_absent_email_is_not_found() {
        let store = test_store().await;

        let err = store
            .update_password("ghost@x.com", "$argon2id$fake")
            .await
            .expect_err("update of missing account should fail");
        assert!(matches!(err, StoreError::NotFound));
    }
}
