//! Account resolution - turns signup/login intents into concrete users

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::errors::AuthError;
use super::models::User;
use crate::common::id_generator::generate_raw_id;
use crate::common::password::{dummy_hash, hash_password, verify_password};
use crate::common::safe_email_log;
use crate::store::{DuplicateField, NewUser, StoreError, UserStore};

/// Role assigned to every account on creation
pub const DEFAULT_ROLE: &str = "tester";

/// Resolves registration and login intents against the user store,
/// enforcing uniqueness and default attributes.
#[derive(Clone)]
pub struct AccountResolver {
    store: Arc<dyn UserStore>,
}

impl AccountResolver {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Register a new account with a password credential.
    ///
    /// The store generates the identifier, so the record is re-read after
    /// insert to observe it.
    pub async fn register_with_password(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() {
            return Err(AuthError::Validation("username is required".to_string()));
        }
        if email.is_empty() {
            return Err(AuthError::Validation("email is required".to_string()));
        }
        if password.trim().is_empty() {
            return Err(AuthError::Validation("password is required".to_string()));
        }

        if self.store.email_exists(email).await? {
            return Err(AuthError::DuplicateEmail);
        }
        if self.store.username_exists(username).await? {
            return Err(AuthError::DuplicateUsername);
        }

        let password_hash = hash_password(password)
            .map_err(|_| AuthError::Internal("failed to hash password".to_string()))?;

        // The unique indexes backstop the pre-checks above, so a race
        // between two signups still yields a typed duplicate error.
        self.store
            .create_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role: DEFAULT_ROLE.to_string(),
                picture: None,
            })
            .await?;

        info!(email = %safe_email_log(email), "New user account created");

        self.fetch_created(email).await
    }

    /// Validate password credentials and return the matching user.
    ///
    /// Unknown email and wrong password deliberately produce the same
    /// error, and both run the full hash verification.
    pub async fn authenticate_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.trim().is_empty() {
            return Err(AuthError::InvalidCredentials);
        }

        let user = self.store.find_by_email(email).await?;

        // Without a stored credential (unknown email, or a Google-first
        // account with an empty hash) verify against a dummy hash so every
        // failure path pays the full Argon2 cost. An empty string would
        // short-circuit at parse time and time-leak which emails exist.
        let (stored_hash, user) = match &user {
            Some(u) if !u.password_hash.is_empty() => (u.password_hash.as_str(), user.as_ref()),
            _ => (dummy_hash(), None),
        };

        if !verify_password(password, stored_hash) {
            warn!(email = %safe_email_log(email), "Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        match user {
            Some(u) => Ok(u.clone()),
            None => Err(AuthError::InvalidCredentials),
        }
    }

    /// Resolve a verified external identity to a user, creating one on
    /// first contact. Returns the user plus whether it was just created.
    ///
    /// Concurrency contract: if two calls race on the same new email, the
    /// loser of the unique-index race re-fetches and returns the winner's
    /// record instead of surfacing a duplicate-key error.
    pub async fn resolve_external_identity(
        &self,
        name: &str,
        email: &str,
        picture: Option<&str>,
    ) -> Result<(User, bool), AuthError> {
        let name = name.trim();
        let email = email.trim();

        if email.is_empty() {
            return Err(AuthError::Validation("email is required".to_string()));
        }
        if name.is_empty() {
            return Err(AuthError::Validation("name is required".to_string()));
        }

        // A lookup failure is an infrastructure error, not "not found" -
        // it must never fall through to user creation.
        if let Some(existing) = self.store.find_by_email(email).await? {
            debug!(user_id = %existing.id, "Found existing user for Google identity");
            return Ok((existing, false));
        }

        match self.create_external_user(name, email, picture).await {
            Ok(()) => {}
            Err(StoreError::Duplicate(DuplicateField::Email)) => {
                // Lost a concurrent-create race; the other caller's row wins.
                debug!(
                    email = %safe_email_log(email),
                    "Duplicate create detected, returning existing user"
                );
                let user = self
                    .store
                    .find_by_email(email)
                    .await?
                    .ok_or(AuthError::Store(sqlx::Error::RowNotFound))?;
                return Ok((user, false));
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            email = %safe_email_log(email),
            provider = "google",
            "New user account created via Google"
        );

        let user = self.fetch_created(email).await?;
        Ok((user, true))
    }

    /// Set or replace the password credential for an account.
    pub async fn set_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let email = email.trim();

        if email.is_empty() || password.trim().is_empty() {
            return Err(AuthError::Validation(
                "email and password are required".to_string(),
            ));
        }
        if password.len() < 6 {
            return Err(AuthError::Validation(
                "password must be at least 6 characters".to_string(),
            ));
        }

        if !self.store.email_exists(email).await? {
            return Err(AuthError::NotFound);
        }

        let password_hash = hash_password(password)
            .map_err(|_| AuthError::Internal("failed to hash password".to_string()))?;
        self.store.update_password(email, &password_hash).await?;

        info!(email = %safe_email_log(email), "Password updated");

        Ok(())
    }

    /// Insert a Google-first account. Display names are not unique in the
    /// wild, so a username collision retries once with a random suffix.
    async fn create_external_user(
        &self,
        name: &str,
        email: &str,
        picture: Option<&str>,
    ) -> Result<(), StoreError> {
        let user = NewUser {
            username: name.to_string(),
            email: email.to_string(),
            password_hash: String::new(),
            role: DEFAULT_ROLE.to_string(),
            picture: picture.map(str::to_string),
        };

        match self.store.create_user(user.clone()).await {
            Err(StoreError::Duplicate(DuplicateField::Username)) => {
                let suffixed = format!("{}_{}", name, generate_raw_id(4));
                debug!(username = %suffixed, "Display name taken, retrying with suffix");
                self.store
                    .create_user(NewUser {
                        username: suffixed,
                        ..user
                    })
                    .await
            }
            other => other,
        }
    }

    async fn fetch_created(&self, email: &str) -> Result<User, AuthError> {
        self.store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::Store(sqlx::Error::RowNotFound))
    }
}
