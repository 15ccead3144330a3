//! Security headers for HTTP responses
//!
//! Every reply of the JSON API goes out with these headers.

use warp::http::header::{HeaderMap, HeaderName, HeaderValue};

/// Strict Content Security Policy for API endpoints
const STRICT_CSP: &str = "default-src 'none'; frame-ancestors 'none';";

const API_HEADERS: [(&str, &str); 5] = [
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "no-referrer"),
    ("content-security-policy", STRICT_CSP),
    ("cache-control", "no-cache, no-store, must-revalidate"),
];

/// Strict security headers for API endpoints
pub fn api_security_header_map() -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in API_HEADERS {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}

/// Filter wrapper adding [`api_security_header_map`] to every reply
pub fn with_api_security_headers() -> warp::reply::with::WithHeaders {
    warp::reply::with::headers(api_security_header_map())
}

#[cfg(test)]
mod tests {
    use super::*;
    use warp::Filter;

    #[test]
    fn test_strict_csp_for_api() {
        assert!(STRICT_CSP.contains("default-src 'none'"));
        assert!(STRICT_CSP.contains("frame-ancestors 'none'"));
        assert!(!STRICT_CSP.contains("unsafe-inline"));
    }

    #[tokio::test]
    async fn test_headers_are_applied() {
        let filter = warp::any().map(warp::reply).with(with_api_security_headers());
        let response = warp::test::request().reply(&filter).await;

        let headers = response.headers();
        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["cache-control"], "no-cache, no-store, must-revalidate");
    }
}
