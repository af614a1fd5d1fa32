//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/users/signup` - Password signup (returns JWT)
/// - `POST /api/auth/login` - Password login (returns JWT)
/// - `POST /api/auth/google` - Unified Google sign-in/sign-up
/// - `POST /api/users/set-password` - Set password for Google-first accounts
/// - `GET /api/auth/me` - Current user info (protected)
/// - `GET /health` - Liveness check
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/users/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/google", post(handlers::google_auth))
        .route("/api/users/set-password", post(handlers::set_password))
        .route("/api/auth/me", get(handlers::me))
        .route("/health", get(handlers::health))
}
