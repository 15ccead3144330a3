//! Turns rejections into JSON error replies

use serde::Serialize;
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::error::HrisError;

/// Error body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub kind: &'static str,
}

/// Recovery handler installed on the whole API
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, kind, detail) = if let Some(e) = err.find::<HrisError>() {
        if e.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {}", e);
        }
        (e.status_code(), e.kind(), e.to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", e.to_string())
    } else if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large", "Payload too large".to_string())
    } else if err.find::<warp::reject::LengthRequired>().is_some() {
        (StatusCode::LENGTH_REQUIRED, "length_required", "Content-Length required".to_string())
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported_media_type",
            "Expected application/json".to_string(),
        )
    } else if err.find::<warp::reject::InvalidHeader>().is_some() {
        (StatusCode::BAD_REQUEST, "invalid_header", "Invalid header value".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", "Method Not Allowed".to_string())
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not_found", "Not Found".to_string())
    } else {
        log::error!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Internal Server Error".to_string(),
        )
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&ErrorBody { detail, kind }),
        status,
    ))
}
