//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::errors::{AuthError, TokenError};
use super::models::Claims;
use crate::common::{ApiError, AppState};

/// Verified session claims extractor.
///
/// Validates the bearer token and hands the claims value to the handler
/// as an explicit argument - handlers never fish identity out of ambient
/// request state.
#[derive(Debug)]
pub struct AuthedClaims(pub Claims);

#[async_trait]
impl<S> FromRequestParts<S> for AuthedClaims
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let header = match header {
            Some(h) => h,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing auth".to_string()));
            }
        };

        let token = match header.strip_prefix("Bearer ") {
            Some(rest) => rest,
            None => {
                warn!("Authentication failed: malformed Authorization header");
                return Err(ApiError::Unauthorized(
                    "invalid authorization format, expected: Bearer <token>".to_string(),
                ));
            }
        };

        let claims = app_state.tokens.verify(token).map_err(|e| {
            // Unauthenticated either way, distinct log lines per kind
            match e {
                TokenError::Expired => {
                    // Unverified decode is for the log line only
                    match app_state.tokens.extract_unverified(token) {
                        Ok(stale) => warn!(
                            user_id = %stale.user_id,
                            "Authentication failed: token expired"
                        ),
                        Err(_) => warn!("Authentication failed: token expired"),
                    }
                }
                TokenError::Signature => warn!("Authentication failed: bad token signature"),
                TokenError::Malformed => warn!("Authentication failed: malformed token"),
            }
            ApiError::from(AuthError::TokenInvalid(e))
        })?;

        debug!(user_id = %claims.user_id, "Token verified via extractor");

        Ok(AuthedClaims(claims))
    }
}
