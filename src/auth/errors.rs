//! Core authentication error taxonomy

use thiserror::Error;
use tracing::error;

use crate::common::ApiError;
use crate::store::StoreError;

/// Why a session token failed verification
///
/// All three map to an unauthenticated response; callers may log them
/// differently.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    Signature,
    #[error("token expired")]
    Expired,
}

/// Typed failures surfaced by the account resolver and session facade
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("username already taken")]
    DuplicateUsername,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("user not found")]
    NotFound,
    #[error("failed to verify Google token: {0}")]
    ExternalVerification(String),
    #[error("google token validation service unavailable")]
    VerifierUnavailable,
    #[error("failed to generate token")]
    TokenIssuance,
    #[error(transparent)]
    TokenInvalid(#[from] TokenError),
    #[error("store unavailable")]
    Store(#[source] sqlx::Error),
    #[error("{0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Duplicate(crate::store::DuplicateField::Email) => AuthError::DuplicateEmail,
            StoreError::Duplicate(crate::store::DuplicateField::Username) => {
                AuthError::DuplicateUsername
            }
            StoreError::NotFound => AuthError::NotFound,
            StoreError::Backend(e) => AuthError::Store(e),
        }
    }
}

/// Map core failures onto HTTP status classes: validation, duplicates,
/// credentials, and not-found are client errors; signing and store
/// failures are server errors.
impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::DuplicateEmail => ApiError::Conflict("email already registered".to_string()),
            AuthError::DuplicateUsername => {
                ApiError::Conflict("username already taken".to_string())
            }
            AuthError::InvalidCredentials => {
                ApiError::Unauthorized("invalid email or password".to_string())
            }
            AuthError::NotFound => ApiError::NotFound("user not found".to_string()),
            AuthError::ExternalVerification(msg) => {
                ApiError::Unauthorized(format!("failed to verify Google token: {}", msg))
            }
            AuthError::VerifierUnavailable => ApiError::ServiceUnavailable(
                "google token validation service unavailable".to_string(),
            ),
            AuthError::TokenIssuance => {
                ApiError::InternalServer("failed to generate token".to_string())
            }
            AuthError::TokenInvalid(kind) => ApiError::Unauthorized(kind.to_string()),
            AuthError::Store(e) => {
                error!(error = %e, "Store failure surfaced to HTTP layer");
                ApiError::DatabaseError(e)
            }
            AuthError::Internal(msg) => ApiError::InternalServer(msg),
        }
    }
}
