//! Authentication handlers

use axum::extract::{Extension, Json};
use axum::http::StatusCode;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::extractors::AuthedClaims;
use super::models::{GoogleAuthRequest, LoginRequest, SetPasswordRequest, SignupRequest};
use super::session;
use crate::common::{safe_email_log, ApiError, ApiResponse, AppState};

/// POST /api/users/signup
/// Creates a new account with a password credential and returns a session.
///
/// # Request Body
/// ```json
/// {"name": "...", "email": "...", "password": "..."}
/// ```
pub async fn signup(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse>), ApiError> {
    let state = state_lock.read().await.clone();

    // The signup form's display name doubles as the username
    let auth = session::signup_with_password(
        &state.resolver,
        &state.tokens,
        &payload.name,
        &payload.email,
        &payload.password,
    )
    .await?;

    info!(
        user_id = %auth.user.id,
        email = %safe_email_log(&auth.user.email),
        "User signup successful"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "User created successfully",
            serde_json::json!({
                "token": auth.token,
                "user": auth.user,
            }),
        )),
    ))
}

/// POST /api/auth/login
/// Validates email/password credentials and returns a session.
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let auth = session::login_with_password(
        &state.resolver,
        &state.tokens,
        &payload.email,
        &payload.password,
    )
    .await?;

    info!(
        user_id = %auth.user.id,
        email = %safe_email_log(&auth.user.email),
        "User login successful"
    );

    Ok(Json(ApiResponse::success(
        "Login successful",
        serde_json::json!({
            "token": auth.token,
            "user": auth.user,
        }),
    )))
}

/// POST /api/auth/google
/// Unified Google sign-in/sign-up: verifies the Google-issued credential,
/// creates the account on first contact, and returns a session either way.
pub async fn google_auth(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<GoogleAuthRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    info!("Received Google auth request");
    let state = state_lock.read().await.clone();

    let auth = session::login_with_external_identity(
        &state.resolver,
        &state.tokens,
        state.verifier.as_ref(),
        &payload.credential,
    )
    .await?;

    Ok(Json(ApiResponse::success(
        "Google authentication successful",
        serde_json::json!({
            "token": auth.session.token,
            "user": auth.session.user,
            "is_new_user": auth.is_new_user,
            "needs_password": auth.needs_password,
        }),
    )))
}

/// POST /api/users/set-password
/// Sets a password credential, typically for Google-first accounts.
pub async fn set_password(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<SetPasswordRequest>,
) -> Result<Json<ApiResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    state
        .resolver
        .set_password(&payload.email, &payload.password)
        .await?;

    Ok(Json(ApiResponse::message("Password set successfully")))
}

/// GET /api/auth/me
/// Returns the authenticated user's identity from the verified claims.
pub async fn me(AuthedClaims(claims): AuthedClaims) -> Result<Json<ApiResponse>, ApiError> {
    Ok(Json(ApiResponse::success(
        "User retrieved successfully",
        serde_json::json!({
            "id": claims.user_id,
            "email": claims.email,
            "username": claims.username,
            "role": claims.role,
        }),
    )))
}

/// GET /health
pub async fn health() -> &'static str {
    "OK"
}
