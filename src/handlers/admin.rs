//! Admin-only endpoints

use serde::Serialize;
use warp::{Filter, Rejection, Reply};

use super::{with_role, with_state, AppState};
use crate::auth::{IdentityContext, Role};
use crate::constants::{DEFAULT_LIST_LIMIT, USER_COLLECTION};
use crate::records::get_documents;
use crate::storage::{Document, Filter as DocFilter};

/// Body of every list endpoint
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub count: usize,
    pub items: Vec<Document>,
}

impl ListResponse {
    pub fn new(items: Vec<Document>) -> Self {
        Self { count: items.len(), items }
    }
}

/// `GET /admin/users`, passwords stripped
pub async fn list_users(_admin: IdentityContext, state: AppState) -> Result<impl Reply, Rejection> {
    let mut items = get_documents(state.store.as_ref(), USER_COLLECTION, &DocFilter::new(), DEFAULT_LIST_LIMIT)
        .await
        .map_err(warp::reject::custom)?;

    for item in &mut items {
        item.remove("password");
    }

    Ok(warp::reply::json(&ListResponse::new(items)))
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("admin" / "users")
        .and(warp::get())
        .and(with_role(state.guard.clone(), Role::Admin))
        .and(with_state(state))
        .and_then(list_users)
}
