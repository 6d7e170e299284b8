//! Response relay.
//!
//! # Responsibilities
//! - Return the downstream status with its body
//! - JSON bodies go out as JSON, anything else as the raw bytes
//!
//! # Design Decisions
//! - Content-type agnostic: the body decides, not the header
//! - Non-JSON bodies keep the downstream `Content-Type` (default text/plain)
//! - `Set-Cookie` is relayed so auth sessions survive the hop

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::upstream::UpstreamResponse;

/// Parsed JSON, or the body as a string.
pub fn json_or_text(body: &[u8]) -> Value {
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Relay a downstream response under `status`.
pub fn relay(status: StatusCode, upstream: UpstreamResponse) -> Response {
    let mut response = match serde_json::from_slice::<Value>(&upstream.body) {
        Ok(json) => (status, Json(json)).into_response(),
        Err(_) => {
            let content_type = upstream
                .headers
                .get(header::CONTENT_TYPE)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static("text/plain; charset=utf-8"));
            let mut response = Response::new(Body::from(upstream.body));
            *response.status_mut() = status;
            response.headers_mut().insert(header::CONTENT_TYPE, content_type);
            response
        }
    };

    for cookie in upstream.headers.get_all(header::SET_COOKIE) {
        response.headers_mut().append(header::SET_COOKIE, cookie.clone());
    }
    response
}
