//! Gateway error types.
//!
//! Every error maps onto the JSON shapes the front end expects:
//! `{ "error": ... }` for caller mistakes and `{ "error": ..., "details": ... }`
//! for failures past the routing decision.

use std::error::Error as _;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    // Routing errors
    #[error("Missing 'service' query parameter")]
    MissingService,

    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error("Service '{0}' is not configured")]
    UnconfiguredService(String),

    #[error("Unknown catalog: {0}")]
    UnknownCatalog(String),

    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),

    // Upstream errors
    #[error("Upstream request failed")]
    Upstream(#[from] reqwest::Error),

    #[error("Lookup service responded with status {status}")]
    LookupStatus { status: StatusCode, body: Value },

    #[error("Upstream responded with status {status}")]
    UpstreamStatus { status: StatusCode, body: Value },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingService | Self::UnknownService(_) | Self::UnconfiguredService(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::UnknownCatalog(_) => StatusCode::NOT_FOUND,
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::UpstreamStatus { status, .. } => *status,
            Self::InvalidTarget(_)
            | Self::Upstream(_)
            | Self::LookupStatus { .. }
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            Self::Upstream(e) => Some(Value::String(upstream_detail(e))),
            Self::LookupStatus { status, body } | Self::UpstreamStatus { status, body } => {
                Some(json!({ "status": status.as_u16(), "body": body }))
            }
            Self::InvalidTarget(detail) | Self::Internal(detail) => Some(Value::String(detail.clone())),
            _ => None,
        }
    }
}

/// Flatten the reqwest error chain, which hides the interesting part
/// (connection refused, DNS failure) behind "error sending request".
fn upstream_detail(err: &reqwest::Error) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        detail.push_str(": ");
        detail.push_str(&inner.to_string());
        source = inner.source();
    }
    if err.is_timeout() {
        detail.push_str(" (timed out)");
    }
    detail
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self.details() {
            Some(details) => json!({ "error": self.to_string(), "details": details }),
            None => json!({ "error": self.to_string() }),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, status = %status, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}
