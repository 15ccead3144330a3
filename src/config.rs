//! Server configuration module
//! Handles configuration parameters for the HRIS backend, read from the environment

use crate::constants::{DEFAULT_HOST, DEFAULT_PORT, MIN_TOKEN_SECRET_LEN};
use crate::error::{HrisError, Result};
use std::env;

/// Server configuration parameters
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Reported by the diagnostics endpoint only
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    /// Secret for HMAC-tagged tokens; `None` issues unsigned tokens
    pub token_secret: Option<String>,
    /// Seed the default admin/employee accounts at startup
    pub seed_users: bool,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    /// Create a test configuration
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            database_name: None,
            token_secret: None,
            seed_users: true,
            cors_origins: Vec::new(),
        }
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or(DEFAULT_HOST.to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| HrisError::ConfigError(format!("PORT must be a valid port number, got '{}'", raw)))?,
            Err(_) => DEFAULT_PORT,
        };

        let database_url = non_empty_var("DATABASE_URL");
        let database_name = non_empty_var("DATABASE_NAME");

        let token_secret = non_empty_var("FLAMESBLUE_TOKEN_SECRET");
        if let Some(ref secret) = token_secret {
            Self::validate_token_secret(secret)?;
        }

        let seed_users = env::var("FLAMESBLUE_SEED_USERS")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);

        let cors_origins = env::var("FLAMESBLUE_CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            database_url,
            database_name,
            token_secret,
            seed_users,
            cors_origins,
        })
    }

    fn validate_token_secret(secret: &str) -> Result<()> {
        if secret.len() < MIN_TOKEN_SECRET_LEN {
            return Err(HrisError::ConfigError(format!(
                "FLAMESBLUE_TOKEN_SECRET must be at least {} characters long. \
                 Generate one with: openssl rand -base64 32",
                MIN_TOKEN_SECRET_LEN
            )));
        }
        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
