//! The `/api/proxy` handler.
//!
//! ```text
//! ?service=<key>&path=..&path0=..&<params>
//!     → resolve key against the current ServiceTable
//!     → lookup key:  GET <lookup url>            (method, path, params ignored)
//!     → service key: <method> <base>/<path>?<params> with the original body
//!     → relay status + body
//! ```

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::error::{GatewayError, Result};
use crate::http::body::{carries_body, read_body};
use crate::http::request::{forwardable_headers, request_id};
use crate::http::response::{json_or_text, relay};
use crate::observability::metrics;
use crate::routing::{Destination, ProxyQuery};
use crate::state::{AppState, Snapshot};
use crate::upstream::{UpstreamRequest, UpstreamResponse};

pub async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let snapshot = state.snapshot();
    let query = ProxyQuery::parse(request.uri().query());

    let (label, outcome) = match snapshot.table.resolve(query.service.as_deref()) {
        Ok(Destination::Lookup { key, url }) => {
            let (method, headers) = (request.method(), request.headers());
            (key.to_string(), lookup(&state, &snapshot, key, url, method, headers).await)
        }
        Ok(Destination::Service { key, base_url }) => (
            key.to_string(),
            forward(&state, &snapshot, key, base_url, &query, request).await,
        ),
        Err(e) => ("invalid".to_string(), Err(e)),
    };

    let response = outcome.unwrap_or_else(IntoResponse::into_response);
    metrics::record_request(&label, &method, response.status().as_u16(), start_time);
    response
}

/// Unconditional GET to a lookup URL.
async fn lookup(
    state: &AppState,
    snapshot: &Snapshot,
    key: &str,
    url: &str,
    method: &Method,
    headers: &HeaderMap,
) -> Result<Response> {
    let url = Url::parse(url).map_err(|e| GatewayError::InvalidTarget(format!("{url}: {e}")))?;
    let timeout = Duration::from_secs(snapshot.config.timeouts.upstream_secs);

    tracing::info!(
        request_id = %request_id(headers),
        lookup = key,
        method = %method,
        target = %url,
        "Resolving lookup"
    );

    let upstream = state.upstream.send(UpstreamRequest::get(url, timeout)).await?;
    if !upstream.status.is_success() {
        return Err(GatewayError::LookupStatus {
            status: upstream.status,
            body: json_or_text(&upstream.body),
        });
    }
    Ok(relay(StatusCode::OK, upstream))
}

/// Forward to a regular service and relay whatever comes back.
async fn forward(
    state: &AppState,
    snapshot: &Snapshot,
    key: &str,
    base_url: &str,
    query: &ProxyQuery,
    request: Request<Body>,
) -> Result<Response> {
    let url = query.target_url(base_url)?;
    let (parts, body) = request.into_parts();

    let body = if carries_body(&parts.method) {
        read_body(body, snapshot.config.security.max_body_size).await?
    } else {
        None
    };
    let timeout = snapshot
        .config
        .timeouts
        .upstream_for(key, query.last_segment());

    tracing::info!(
        request_id = %request_id(&parts.headers),
        service = key,
        method = %parts.method,
        target = %url,
        body_bytes = body.as_ref().map_or(0, |b| b.len()),
        "Forwarding request"
    );

    let UpstreamResponse {
        status,
        headers,
        body,
    } = state
        .upstream
        .send(UpstreamRequest {
            method: parts.method,
            url,
            headers: forwardable_headers(&parts.headers),
            body,
            timeout,
        })
        .await?;

    if status.is_server_error() {
        tracing::warn!(service = key, status = %status, "Downstream server error");
    }

    Ok(relay(status, UpstreamResponse { status, headers, body }))
}
