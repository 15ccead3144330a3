//! Login: credential check against the store, then token issuance

use serde::Serialize;
use std::sync::Arc;

use crate::auth::token::TokenCodec;
use crate::auth::user::Role;
use crate::error::{HrisError, Result};
use crate::security::constant_time_eq;
use crate::security_logger::{SecurityEvent, SecurityLogger};
use crate::storage::CredentialStore;

/// Compared against when the identity is unknown, so both failure paths do the same work
const ABSENT_PASSWORD: &str = "\u{0}absent-account\u{0}";

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginOutcome {
    #[serde(rename = "email")]
    pub identity: String,
    pub name: String,
    pub role: Role,
    pub token: String,
}

/// Validates login attempts and mints tokens
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
    security_log: Arc<SecurityLogger>,
}

impl Authenticator {
    pub fn new(store: Arc<dyn CredentialStore>, codec: TokenCodec) -> Self {
        Self {
            store,
            codec,
            security_log: Arc::new(SecurityLogger::new()),
        }
    }

    /// Share a security logger with the rest of the service
    pub fn with_security_logger(mut self, security_log: Arc<SecurityLogger>) -> Self {
        self.security_log = security_log;
        self
    }

    /// Check `identity`/`password` and issue a token.
    ///
    /// Unknown identity and wrong password both yield `InvalidCredentials`.
    /// The active flag is only consulted once the password matched.
    pub async fn login(&self, identity: &str, password: &str) -> Result<LoginOutcome> {
        let user = match self.store.find_user_by_identity(identity).await? {
            Some(user) if user.password_matches(password) => user,
            found => {
                if found.is_none() {
                    std::hint::black_box(constant_time_eq(ABSENT_PASSWORD, password));
                }
                self.security_log
                    .log_event(SecurityEvent::LoginFailed { identity: identity.to_string() })
                    .await;
                return Err(HrisError::InvalidCredentials);
            }
        };

        if !user.can_log_in() {
            self.security_log
                .log_event(SecurityEvent::InactiveLogin { identity: identity.to_string() })
                .await;
            return Err(HrisError::AccountInactive);
        }

        let token = self.codec.issue(user.role, &user.identity);
        self.security_log
            .log_event(SecurityEvent::LoginSucceeded {
                identity: user.identity.clone(),
                role: user.role,
            })
            .await;

        Ok(LoginOutcome {
            name: user.display_name().to_string(),
            identity: user.identity,
            role: user.role,
            token,
        })
    }
}
