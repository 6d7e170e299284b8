//! Request body capture.
//!
//! The whole body is buffered before forwarding so any payload (JSON,
//! multipart uploads, raw bytes) reaches the downstream service unchanged.

use axum::body::{Body, Bytes};
use axum::http::Method;
use futures_util::StreamExt;

use crate::error::{GatewayError, Result};

/// GET and HEAD never carry a forwarded body.
pub fn carries_body(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD)
}

/// Buffer the body, up to `limit` bytes.
///
/// A stream that fails midway is logged and treated as "no body"; only an
/// oversized body is an error.
pub async fn read_body(body: Body, limit: usize) -> Result<Option<Bytes>> {
    let mut stream = body.into_data_stream();
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(chunk) => {
                if buffer.len() + chunk.len() > limit {
                    return Err(GatewayError::PayloadTooLarge { limit });
                }
                buffer.extend_from_slice(&chunk);
            }
            Err(e) => {
                tracing::warn!(error = %e, read = buffer.len(), "Failed to read request body, forwarding without body");
                return Ok(None);
            }
        }
    }

    if buffer.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Bytes::from(buffer)))
    }
}
