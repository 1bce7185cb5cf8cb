// Startup configuration
// Loaded once from the environment; nothing reads env vars after this.

use std::env;

/// Secrets for the token issuer. Injected at construction so tests can run
/// with literal secrets instead of process environment.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
}

/// Application configuration assembled at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub upload_dir: String,
    pub auth: AuthConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

impl Config {
    /// Read the full configuration from the environment.
    /// Missing secrets or database URL are fatal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = require("DATABASE_URL")?;
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::Invalid("PORT", e.to_string()))?,
            Err(_) => 3000,
        };
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        let auth = AuthConfig {
            access_secret: require("JWT_SECRET")?,
            refresh_secret: require("JWT_REFRESH_SECRET")?,
        };

        Ok(Self {
            database_url,
            host,
            port,
            upload_dir,
            auth,
        })
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}
