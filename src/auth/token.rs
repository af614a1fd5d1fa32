//! Session token issuance and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use tracing::error;

use super::errors::{AuthError, TokenError};
use super::models::Claims;

/// Token validity window; `exp` is always `iat` plus this.
const TOKEN_TTL_HOURS: i64 = 24;

/// Issuer name embedded in every token
const TOKEN_ISSUER: &str = "testops-backend";

/// Issues and verifies HS256-signed session tokens.
///
/// Stateless apart from the signing secret, which is injected once at
/// startup and never rotated at runtime.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
}

impl TokenService {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Create a signed session token for a user, valid for 24 hours.
    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        username: &str,
        role: &str,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: user_id.to_string(),
            email: email.to_string(),
            username: username.to_string(),
            role: role.to_string(),
            iss: TOKEN_ISSUER.to_string(),
            iat: now,
            exp: now + Duration::hours(TOKEN_TTL_HOURS).num_seconds(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            error!(error = %e, user_id = %user_id, "JWT encoding error");
            AuthError::TokenIssuance
        })
    }

    /// Validate a token and return its claims.
    ///
    /// Only HS256 is accepted; a token signed with any other algorithm is
    /// rejected the same way as a bad signature. Expiry is checked with
    /// zero leeway.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::Signature,
            _ => TokenError::Malformed,
        })?;

        Ok(decoded.claims)
    }

    /// Decode claims without checking signature or expiry.
    ///
    /// Diagnostic use only - the output must never be treated as proof of
    /// identity.
    pub fn extract_unverified(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.set_required_spec_claims::<&str>(&[]);

        let decoded = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|_| TokenError::Malformed)?;

        Ok(decoded.claims)
    }
}
