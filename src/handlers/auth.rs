//! Login and identity endpoints

use serde::Deserialize;
use warp::{Filter, Rejection, Reply};

use super::{with_identity, with_state, AppState};
use crate::auth::IdentityContext;
use crate::constants::MAX_BODY_BYTES;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login identity; not validated as an address
    pub email: String,
    pub password: String,
}

/// `POST /auth/login`
pub async fn login(body: LoginRequest, state: AppState) -> Result<impl Reply, Rejection> {
    let outcome = state
        .authenticator
        .login(&body.email, &body.password)
        .await
        .map_err(warp::reject::custom)?;

    Ok(warp::reply::json(&outcome))
}

/// `GET /auth/me`
pub async fn me(context: IdentityContext) -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&context))
}

pub fn routes(state: AppState) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let login_route = warp::path!("auth" / "login")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(login);

    let me_route = warp::path!("auth" / "me")
        .and(warp::get())
        .and(with_identity(state.guard))
        .and_then(me);

    login_route.or(me_route)
}
