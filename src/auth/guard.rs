//! Per-request authentication from the Authorization header
//!
//! Lifecycle of one request: no token, token present, decoded, authorized,
//! and optionally role-checked. Any failed step ends the request with its
//! own error kind; nothing is kept between requests.

use std::sync::Arc;

use crate::auth::token::TokenCodec;
use crate::auth::user::{IdentityContext, Role};
use crate::error::{HrisError, Result};
use crate::security_logger::{SecurityEvent, SecurityLogger};
use crate::storage::CredentialStore;

/// Last whitespace-separated segment of an Authorization header value.
/// The scheme word, if any, is not inspected.
pub fn extract_token(header: &str) -> Option<&str> {
    header.split_whitespace().last()
}

/// Resolves bearer tokens into identity contexts
pub struct AccessGuard {
    store: Arc<dyn CredentialStore>,
    codec: TokenCodec,
    security_log: Arc<SecurityLogger>,
}

impl AccessGuard {
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

    /// Authenticate a request from its raw Authorization header value
    pub async fn authenticate(&self, header: Option<&str>) -> Result<IdentityContext> {
        let token = match header.and_then(extract_token) {
            Some(token) => token,
            None => {
                self.security_log.log_event(SecurityEvent::MissingCredentials).await;
                return Err(HrisError::MissingCredentials);
            }
        };

        let (role, identity) = match self.decode(token) {
            Ok(decoded) => decoded,
            Err(e) => {
                self.security_log.log_event(SecurityEvent::TokenRejected).await;
                return Err(e);
            }
        };

        // The account is re-read on every request, so deactivation takes effect
        // on the next call even though the token itself stays decodable.
        let user = match self.store.find_user_by_identity(&identity).await? {
            Some(user) if user.has_access() => user,
            _ => {
                self.security_log
                    .log_event(SecurityEvent::UnauthorizedAccess { identity })
                    .await;
                return Err(HrisError::Unauthorized);
            }
        };

        // NOTE: the role comes from the token, not from the current record. A
        // role change only reaches the caller after they log in again.
        Ok(IdentityContext {
            name: user.display_name().to_string(),
            identity,
            role,
        })
    }

    /// Authenticate and additionally require `role`
    pub async fn authorize(&self, header: Option<&str>, role: Role) -> Result<IdentityContext> {
        let context = self.authenticate(header).await?;
        self.require_role(&context, role).await?;
        Ok(context)
    }

    /// Fails with `Forbidden` unless `context` holds exactly `role`
    pub async fn require_role(&self, context: &IdentityContext, role: Role) -> Result<()> {
        let result = context.require_role(role);
        if result.is_err() {
            self.security_log
                .log_event(SecurityEvent::PermissionDenied {
                    identity: context.identity.clone(),
                    required: role,
                })
                .await;
        }
        result
    }

    fn decode(&self, token: &str) -> Result<(Role, String)> {
        let (role, identity) = self.codec.parse(token)?;
        // Every issued token carries a known role
        let role = role.parse::<Role>().map_err(|_| HrisError::InvalidToken)?;
        Ok((role, identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token;
    use crate::auth::user::User;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    #[derive(Default)]
    struct MutableStore(RwLock<HashMap<String, User>>);

    #[async_trait]
    impl CredentialStore for MutableStore {
        async fn find_user_by_identity(&self, identity: &str) -> Result<Option<User>> {
            Ok(self.0.read().await.get(identity).cloned())
        }

        async fn count_users_by_identity(&self, identity: &str) -> Result<u64> {
            Ok(self.0.read().await.contains_key(identity) as u64)
        }
    }

    async fn guard_with(users: Vec<User>) -> (AccessGuard, Arc<MutableStore>) {
        let store = Arc::new(MutableStore::default());
        for user in users {
            store.0.write().await.insert(user.identity.clone(), user);
        }
        (AccessGuard::new(store.clone(), TokenCodec::unsigned()), store)
    }

    #[test]
    fn test_extract_token_takes_last_segment() {
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("abc"), Some("abc"));
        assert_eq!(extract_token("Token x y z"), Some("z"));
        assert_eq!(extract_token("  Bearer\tabc  "), Some("abc"));
        assert_eq!(extract_token("   "), None);
        assert_eq!(extract_token(""), None);
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (guard, _) = guard_with(vec![]).await;
        assert_eq!(guard.authenticate(None).await, Err(HrisError::MissingCredentials));
        assert_eq!(guard.authenticate(Some("  ")).await, Err(HrisError::MissingCredentials));
    }

    #[tokio::test]
    async fn test_invalid_token_propagates() {
        let (guard, _) = guard_with(vec![User::new("admin", "admin", Role::Admin)]).await;
        assert_eq!(guard.authenticate(Some("Bearer zzz")).await, Err(HrisError::InvalidToken));

        let unknown_role = token::encode("root", "admin");
        assert_eq!(
            guard.authenticate(Some(format!("Bearer {}", unknown_role).as_str())).await,
            Err(HrisError::InvalidToken)
        );
    }

    #[tokio::test]
    async fn test_valid_token_resolves_context() {
        let (guard, _) =
            guard_with(vec![User::new("admin", "admin", Role::Admin).with_name("Administrator")]).await;
        let header = format!("Bearer {}", token::encode("admin", "admin"));

        let ctx = guard.authenticate(Some(header.as_str())).await.unwrap();
        assert_eq!(ctx.identity, "admin");
        assert_eq!(ctx.role, Role::Admin);
        assert_eq!(ctx.name, "Administrator");
    }

    #[tokio::test]
    async fn test_unknown_account_is_unauthorized() {
        let (guard, _) = guard_with(vec![]).await;
        let header = token::encode("employee", "ghost");
        assert_eq!(guard.authenticate(Some(header.as_str())).await, Err(HrisError::Unauthorized));
    }

    #[tokio::test]
    async fn test_deactivation_invalidates_existing_tokens() {
        let (guard, store) = guard_with(vec![User::new("e1", "pw", Role::Employee)]).await;
        let token = token::encode("employee", "e1");

        assert!(guard.authenticate(Some(token.as_str())).await.is_ok());

        store.0.write().await.get_mut("e1").unwrap().is_active = Some(false);

        assert!(token::decode(&token).is_ok());
        assert_eq!(guard.authenticate(Some(token.as_str())).await, Err(HrisError::Unauthorized));
    }

    #[tokio::test]
    async fn test_only_exactly_true_flag_is_accepted() {
        let records = [
            serde_json::json!({"email": "missing", "password": "pw"}),
            serde_json::json!({"email": "null", "password": "pw", "is_active": null}),
            serde_json::json!({"email": "text", "password": "pw", "is_active": "true"}),
            serde_json::json!({"email": "active", "password": "pw", "is_active": true}),
        ];
        let users = records
            .iter()
            .map(|record| User::from_document(record.as_object().unwrap()).unwrap())
            .collect();
        let (guard, _) = guard_with(users).await;

        for identity in ["missing", "null", "text"] {
            let token = token::encode("employee", identity);
            assert_eq!(
                guard.authenticate(Some(token.as_str())).await,
                Err(HrisError::Unauthorized),
                "identity {}",
                identity
            );
        }

        let token = token::encode("employee", "active");
        assert!(guard.authenticate(Some(token.as_str())).await.is_ok());
    }

    #[tokio::test]
    async fn test_role_is_taken_from_token() {
        let (guard, store) = guard_with(vec![User::new("e1", "pw", Role::Admin)]).await;
        let token = token::encode("admin", "e1");

        store.0.write().await.get_mut("e1").unwrap().role = Role::Employee;

        let ctx = guard.authenticate(Some(token.as_str())).await.unwrap();
        assert_eq!(ctx.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_authorize_checks_role() {
        let (guard, _) = guard_with(vec![User::new("e1", "pw", Role::Employee)]).await;
        let header = format!("Bearer {}", token::encode("employee", "e1"));

        assert!(guard.authorize(Some(header.as_str()), Role::Employee).await.is_ok());
        assert_eq!(
            guard.authorize(Some(header.as_str()), Role::Admin).await,
            Err(HrisError::Forbidden)
        );
    }
}
