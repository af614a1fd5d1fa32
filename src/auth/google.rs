//! Google ID token verification

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tracing::{debug, error, warn};

use super::errors::AuthError;
use super::models::IdentityAssertion;

/// Validates an external identity token and yields the verified identity.
///
/// Behind a trait so the session facade can be exercised without network
/// access.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, credential: &str) -> Result<IdentityAssertion, AuthError>;
}

/// Verifies Google ID tokens against Google's tokeninfo endpoint.
///
/// Docs: https://developers.google.com/identity/sign-in/web/backend-auth
pub struct GoogleVerifier {
    http: Client,
    client_id: Option<String>,
}

impl GoogleVerifier {
    pub fn new(http: Client, client_id: Option<String>) -> Self {
        Self { http, client_id }
    }
}

#[async_trait]
impl IdentityVerifier for GoogleVerifier {
    async fn verify(&self, credential: &str) -> Result<IdentityAssertion, AuthError> {
        let tokeninfo_url = format!(
            "https://oauth2.googleapis.com/tokeninfo?id_token={}",
            credential
        );

        debug!("Initiating Google token validation with tokeninfo endpoint");

        let resp = self.http.get(&tokeninfo_url).send().await.map_err(|e| {
            error!(
                error = %e,
                endpoint = "https://oauth2.googleapis.com/tokeninfo",
                "HTTP error contacting Google tokeninfo endpoint"
            );
            AuthError::VerifierUnavailable
        })?;

        let status = resp.status();
        debug!(http_status = %status, "Received response from Google tokeninfo endpoint");

        if !status.is_success() {
            warn!(http_status = %status, "Google tokeninfo rejected the token");
            return Err(AuthError::ExternalVerification(match status.as_u16() {
                400 => "invalid or malformed id_token".to_string(),
                401 => "expired or invalid id_token".to_string(),
                _ => "id_token validation failed".to_string(),
            }));
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Google tokeninfo JSON response");
            AuthError::ExternalVerification("malformed id_token".to_string())
        })?;

        parse_tokeninfo(&body, self.client_id.as_deref())
    }
}

/// Extract the identity assertion from a tokeninfo payload, checking
/// expiry and (when configured) the audience.
fn parse_tokeninfo(
    body: &serde_json::Value,
    client_id: Option<&str>,
) -> Result<IdentityAssertion, AuthError> {
    let email = body.get("email").and_then(|v| v.as_str());
    let name = body.get("name").and_then(|v| v.as_str());
    let picture = body
        .get("picture")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let (email, name) = match (email, name) {
        (Some(e), Some(n)) => (e.to_string(), n.to_string()),
        _ => {
            warn!(
                has_email = email.is_some(),
                has_name = name.is_some(),
                "Google token missing required fields"
            );
            return Err(AuthError::ExternalVerification(
                "token missing required fields".to_string(),
            ));
        }
    };

    let email_verified = body
        .get("email_verified")
        .and_then(|v| {
            // tokeninfo returns this claim as the string "true"/"false"
            v.as_bool().or_else(|| v.as_str().map(|s| s == "true"))
        })
        .unwrap_or(false);
    if !email_verified {
        warn!("Google token contains unverified email address");
    }

    if let Some(exp) = body
        .get("exp")
        .and_then(|v| v.as_i64().or_else(|| v.as_str().and_then(|s| s.parse().ok())))
    {
        if exp < Utc::now().timestamp() {
            warn!(token_exp = exp, "Google token has expired");
            return Err(AuthError::ExternalVerification(
                "token has expired".to_string(),
            ));
        }
    }

    if let Some(client_id) = client_id {
        match body.get("aud").and_then(|v| v.as_str()) {
            Some(aud) if aud == client_id => {
                debug!(token_audience = %aud, "Google token audience validation successful");
            }
            Some(aud) => {
                warn!(
                    token_audience = %aud,
                    expected_client_id = %client_id,
                    "Google token audience validation failed - rejecting token"
                );
                return Err(AuthError::ExternalVerification(
                    "token audience mismatch".to_string(),
                ));
            }
            None => {
                warn!("Google token missing audience field - rejecting token");
                return Err(AuthError::ExternalVerification(
                    "token missing audience".to_string(),
                ));
            }
        }
    }

    Ok(IdentityAssertion {
        email,
        name,
        picture,
        email_verified,
    })
}
