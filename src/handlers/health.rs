//! Liveness and database diagnostics

use serde::Serialize;
use std::collections::HashMap;
use std::convert::Infallible;
use warp::{Filter, Rejection, Reply};

use super::{with_state, AppState};

#[derive(Debug, Serialize)]
pub struct DiagnosticsReport {
    pub backend: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
    /// Auth event counts since startup
    pub security_events: HashMap<String, usize>,
}

/// `GET /`
pub async fn root() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&serde_json::json!({
        "message": "FlamesBlue HRIS+ERP Backend",
        "status": "ok"
    })))
}

/// `GET /test`
pub async fn diagnostics(state: AppState) -> Result<impl Reply, Infallible> {
    let set_or_not = |value: &Option<String>| (if value.is_some() { "Set" } else { "Not Set" }).to_string();

    let mut report = DiagnosticsReport {
        backend: "Running".to_string(),
        database: "Available".to_string(),
        database_url: set_or_not(&state.config.database_url),
        database_name: set_or_not(&state.config.database_name),
        connection_status: "Not Connected".to_string(),
        collections: Vec::new(),
        security_events: state.security_log.get_event_stats().await,
    };

    match state.store.list_collection_names().await {
        Ok(collections) => {
            report.collections = collections;
            report.database = "Connected & Working".to_string();
            report.connection_status = "Connected".to_string();
        }
        Err(e) => {
            let detail: String = e.to_string().chars().take(80).collect();
            log::warn!("Database diagnostics failed: {}", e);
            report.database = format!("Connected but Error: {}", detail);
        }
    }

    Ok(warp::reply::json(&report))
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let root_route = warp::path::end().and(warp::get()).and_then(root);

    let test_route = warp::path!("test")
        .and(warp::get())
        .and(with_state(state))
        .and_then(diagnostics);

    root_route.or(test_route)
}
