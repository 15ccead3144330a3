use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;

use flamesblue::config::ServerConfig;
use flamesblue::handlers::{routes, AppState};
use flamesblue::seed::seed_users;
use flamesblue::storage::{DocumentStore, MemoryDocumentStore};

#[tokio::main]
async fn main() {
    // Initialize env
    let dotenv_result = dotenvy::dotenv();

    // Initialize logging
    env_logger::init();

    match dotenv_result {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, signed_tokens={}",
        config.host,
        config.port,
        config.token_secret.is_some()
    );
    if config.token_secret.is_none() {
        warn!("FLAMESBLUE_TOKEN_SECRET is not set: issuing unsigned tokens that anyone can forge");
    }

    let store: Arc<dyn DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let seed = config.seed_users;
    let addr: SocketAddr = match config.bind_address().parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    let state = AppState::new(config, store);

    if seed {
        match seed_users(state.store.as_ref(), state.credentials.as_ref()).await {
            Ok(created) => info!("Seeding complete, {} account(s) created", created),
            Err(e) => error!("Seeding default users failed: {}", e),
        }
    }

    info!("Starting FlamesBlue HRIS+ERP backend on {}", addr);
    warp::serve(routes(state)).run(addr).await;
}
