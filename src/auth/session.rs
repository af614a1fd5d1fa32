//! Session facade - composes the resolver, verifier, and token service
//! into the three public authentication flows.

use tracing::info;

use super::errors::AuthError;
use super::google::IdentityVerifier;
use super::models::{PublicUser, User};
use super::service::AccountResolver;
use super::token::TokenService;
use crate::common::safe_email_log;

/// An issued session: bearer token plus the public view of the user
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}

/// Result of the unified Google flow.
///
/// `needs_password` is advisory for the client UI (prompt to set or verify
/// a password); it never gates anything server-side.
#[derive(Debug, Clone)]
pub struct ExternalAuthSession {
    pub session: AuthSession,
    pub is_new_user: bool,
    pub needs_password: bool,
}

fn issue_session(tokens: &TokenService, user: &User) -> Result<AuthSession, AuthError> {
    let token = tokens.issue(&user.id, &user.email, &user.username, &user.role)?;
    Ok(AuthSession {
        token,
        user: PublicUser::from(user),
    })
}

/// Password signup: register, then issue a session.
pub async fn signup_with_password(
    resolver: &AccountResolver,
    tokens: &TokenService,
    username: &str,
    email: &str,
    password: &str,
) -> Result<AuthSession, AuthError> {
    let user = resolver
        .register_with_password(username, email, password)
        .await?;
    issue_session(tokens, &user)
}

/// Password login: authenticate, then issue a session.
pub async fn login_with_password(
    resolver: &AccountResolver,
    tokens: &TokenService,
    email: &str,
    password: &str,
) -> Result<AuthSession, AuthError> {
    let user = resolver.authenticate_with_password(email, password).await?;
    issue_session(tokens, &user)
}

/// Unified Google sign-in/sign-up: verify the assertion, resolve the
/// account (creating it on first contact), then issue a session.
pub async fn login_with_external_identity(
    resolver: &AccountResolver,
    tokens: &TokenService,
    verifier: &dyn IdentityVerifier,
    credential: &str,
) -> Result<ExternalAuthSession, AuthError> {
    let assertion = verifier.verify(credential).await?;

    let (user, is_new_user) = resolver
        .resolve_external_identity(&assertion.name, &assertion.email, assertion.picture.as_deref())
        .await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        is_new_user = is_new_user,
        "Google authentication successful"
    );

    let session = issue_session(tokens, &user)?;
    Ok(ExternalAuthSession {
        session,
        is_new_user,
        needs_password: true,
    })
}
