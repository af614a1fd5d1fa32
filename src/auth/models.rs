//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User database model
///
/// `password_hash` is never serialized; an empty hash means the account
/// was created via Google and has not set a password yet.
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub picture: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Public user view returned by the API (id, email, username, role only)
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role.clone(),
        }
    }
}

/// JWT claims structure
///
/// `exp` is always exactly 24 hours after `iat`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Verified identity extracted from a Google ID token
#[derive(Debug, Clone)]
pub struct IdentityAssertion {
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub email_verified: bool,
}

/// POST /api/users/signup body
#[derive(Deserialize, Debug)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login body
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/google body - the credential is a Google-issued ID token
#[derive(Deserialize, Debug)]
pub struct GoogleAuthRequest {
    pub credential: String,
}

/// POST /api/users/set-password body
#[derive(Deserialize, Debug)]
pub struct SetPasswordRequest {
    pub email: String,
    pub password: String,
}
