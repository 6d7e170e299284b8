//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a request ID (UUID v4) when the client sent none
//! - Decide which incoming headers travel downstream
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing, and forwarded
//! - Hop-by-hop headers, `Host` and `Content-Length` are never forwarded;
//!   the outbound client sets its own
//! - `Accept-Encoding` is dropped: bodies are parsed and relayed unencoded

use axum::http::header::{self, HeaderMap};

pub const X_REQUEST_ID: &str = "x-request-id";

const NOT_FORWARDED: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
    "accept-encoding",
];

/// Request ID set by the request-id layer, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// End-to-end headers of an incoming request.
pub fn forwardable_headers(incoming: &HeaderMap) -> HeaderMap {
    // Headers named in `Connection` are hop-by-hop too.
    let listed: Vec<String> = incoming
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    let mut forwarded = HeaderMap::with_capacity(incoming.len());
    for (name, value) in incoming {
        if NOT_FORWARDED.contains(&name.as_str()) || listed.iter().any(|l| l == name.as_str())
        {
            continue;
        }
        forwarded.append(name.clone(), value.clone());
    }
    forwarded
}
