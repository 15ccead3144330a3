//! Request handlers for the HTTP API
//!
//! Each submodule exposes its warp filters through a `routes` function;
//! [`routes`] assembles them with rejection recovery, CORS and logging.

pub mod admin;
pub mod auth;
pub mod health;
pub mod records;
pub mod rejection;

use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

use crate::auth::{AccessGuard, Authenticator, IdentityContext, Role, TokenCodec};
use crate::config::ServerConfig;
use crate::security::with_api_security_headers;
use crate::security_logger::SecurityLogger;
use crate::storage::{CredentialStore, DocumentCredentialStore, DocumentStore};

/// Shared dependencies handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub credentials: Arc<dyn CredentialStore>,
    pub authenticator: Arc<Authenticator>,
    pub guard: Arc<AccessGuard>,
    pub security_log: Arc<SecurityLogger>,
}

impl AppState {
    /// Wire the auth core onto a document store
    pub fn new(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        let security_log = Arc::new(SecurityLogger::new());
        let credentials: Arc<dyn CredentialStore> = Arc::new(DocumentCredentialStore::new(store.clone()));
        let codec = TokenCodec::from_secret(config.token_secret.as_deref());

        let authenticator = Authenticator::new(credentials.clone(), codec.clone())
            .with_security_logger(security_log.clone());
        let guard = AccessGuard::new(credentials.clone(), codec).with_security_logger(security_log.clone());

        Self {
            config: Arc::new(config),
            store,
            credentials,
            authenticator: Arc::new(authenticator),
            guard: Arc::new(guard),
            security_log,
        }
    }
}

/// Helper filter to include the shared state in a request
pub fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Resolve the caller from the Authorization header
pub fn with_identity(
    guard: Arc<AccessGuard>,
) -> impl Filter<Extract = (IdentityContext,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let guard = guard.clone();
        async move {
            guard
                .authenticate(header.as_deref())
                .await
                .map_err(warp::reject::custom)
        }
    })
}

/// Resolve the caller and require an exact role
pub fn with_role(
    guard: Arc<AccessGuard>,
    role: Role,
) -> impl Filter<Extract = (IdentityContext,), Error = Rejection> + Clone {
    with_identity(guard.clone()).and_then(move |context: IdentityContext| {
        let guard = guard.clone();
        async move {
            guard
                .require_role(&context, role)
                .await
                .map_err(warp::reject::custom)?;
            Ok::<_, Rejection>(context)
        }
    })
}

fn cors(config: &ServerConfig) -> warp::cors::Cors {
    let builder = warp::cors()
        .allow_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allow_headers(vec!["authorization", "content-type"])
        .allow_credentials(true);

    if config.cors_origins.is_empty() {
        builder.allow_any_origin().build()
    } else {
        builder
            .allow_origins(config.cors_origins.iter().map(String::as_str))
            .build()
    }
}

/// Every API route, ready to serve
pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let cors = cors(&state.config);

    let api = health::routes(state.clone())
        .or(auth::routes(state.clone()))
        .or(admin::routes(state.clone()))
        .or(records::routes(state));

    api.recover(rejection::handle_rejection)
        .with(with_api_security_headers())
        .with(cors)
        .with(warp::log("flamesblue::api"))
}
