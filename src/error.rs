use std::error::Error;
use std::fmt;

use warp::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HrisError {
    // Auth errors
    InvalidToken,
    MissingCredentials,
    InvalidCredentials,
    AccountInactive,
    Unauthorized,
    Forbidden,

    // Storage errors
    StorageError(String),

    // Validation errors
    ValidationError(String),

    // Configuration errors
    ConfigError(String),
}

impl HrisError {
    /// HTTP status surfaced to clients for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidToken
            | Self::MissingCredentials
            | Self::InvalidCredentials
            | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::AccountInactive | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StorageError(_) | Self::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable tag, distinct for every kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidToken => "invalid_token",
            Self::MissingCredentials => "missing_credentials",
            Self::InvalidCredentials => "invalid_credentials",
            Self::AccountInactive => "account_inactive",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::StorageError(_) => "storage_error",
            Self::ValidationError(_) => "validation_error",
            Self::ConfigError(_) => "config_error",
        }
    }
}

impl fmt::Display for HrisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "Invalid token"),
            Self::MissingCredentials => write!(f, "Missing Authorization header"),
            Self::InvalidCredentials => write!(f, "Invalid credentials"),
            Self::AccountInactive => write!(f, "User is inactive"),
            Self::Unauthorized => write!(f, "User not active or not found"),
            Self::Forbidden => write!(f, "Forbidden: insufficient role"),
            Self::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Self::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl Error for HrisError {}

// Lets handlers reject with the typed error and recover it in one place
impl warp::reject::Reject for HrisError {}

impl From<serde_json::Error> for HrisError {
    fn from(err: serde_json::Error) -> Self {
        HrisError::ValidationError(err.to_string())
    }
}

// Generic result type for FlamesBlue
pub type Result<T> = std::result::Result<T, HrisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_kinds_are_distinct() {
        let kinds = [
            HrisError::InvalidToken,
            HrisError::MissingCredentials,
            HrisError::InvalidCredentials,
            HrisError::AccountInactive,
            HrisError::Unauthorized,
            HrisError::Forbidden,
        ]
        .iter()
        .map(|e| e.kind())
        .collect::<std::collections::HashSet<_>>();

        assert_eq!(kinds.len(), 6);
    }

    #[test]
    fn test_inactive_account_status_differs_from_bad_credentials() {
        assert_eq!(HrisError::InvalidCredentials.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(HrisError::AccountInactive.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(HrisError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }
}
