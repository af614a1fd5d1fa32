//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Password signup and login
//! - Unified Google sign-in/sign-up
//! - Session token issuance and verification
//! - AuthedClaims extractor for protected routes

pub mod errors;
pub mod extractors;
pub mod google;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod service;
pub mod session;
pub mod token;


pub use extractors::AuthedClaims;
pub use models::User;
pub use routes::auth_routes;
