//! Outbound HTTP to the downstream microservices.
//!
//! One pooled `reqwest` client shared by the proxy handler and the catalog
//! helpers. Each call carries its own deadline; there are no retries.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use url::Url;

use crate::config::TimeoutConfig;

/// A fully buffered downstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// An outbound call.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    pub timeout: Duration,
}

impl UpstreamRequest {
    /// Plain GET without headers or body.
    pub fn get(url: Url, timeout: Duration) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            body: None,
            timeout,
        }
    }
}

#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
}

impl UpstreamClient {
    /// Build the shared client. The connect timeout is fixed for the
    /// lifetime of the process.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .no_proxy()
            .build()?;
        Ok(Self { http })
    }

    /// Send the request and buffer the whole response body.
    pub async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, reqwest::Error> {
        let UpstreamRequest {
            method,
            url,
            headers,
            body,
            timeout,
        } = request;

        tracing::debug!(method = %method, url = %url, timeout = ?timeout, "Upstream request");

        let mut builder = self
            .http
            .request(method, url)
            .headers(headers)
            .timeout(timeout);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        tracing::debug!(status = %status, bytes = body.len(), "Upstream response");

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}
