// Process-wide configuration, read once at startup

use std::env;
use tracing::warn;

/// Environment-sourced configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub environment: String,
    pub google_client_id: Option<String>,
    pub cors_origins: Vec<String>,
}

fn get_env(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// development defaults where a value is missing.
    pub fn from_env() -> Self {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                warn!("JWT_SECRET not set, using development default");
                "replace_with_strong_secret".to_string()
            }
        };

        let cors_origins: Vec<String> = get_env(
            "CORS_ORIGINS",
            "http://localhost:5173,http://localhost:3000,http://localhost:3456,http://localhost:3457",
        )
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8080),
            database_url: get_env("DATABASE_URL", "sqlite://testops.db"),
            jwt_secret,
            environment: get_env("ENVIRONMENT", "development"),
            google_client_id: env::var("GOOGLE_CLIENT_ID").ok().filter(|v| !v.is_empty()),
            cors_origins,
        }
    }
}
