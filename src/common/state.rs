// Application state shared across all modules

use std::sync::Arc;

use crate::auth::google::IdentityVerifier;
use crate::auth::service::AccountResolver;
use crate::auth::token::TokenService;

/// Application state containing the core services, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub tokens: TokenService,
    pub resolver: AccountResolver,
    pub verifier: Arc<dyn IdentityVerifier>,
}
