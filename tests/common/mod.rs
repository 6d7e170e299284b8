//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, HeaderValue, Method, Request, StatusCode, Uri},
    response::Response,
    Router,
};
use inmo_gateway::config::{ConfigSource, GatewayConfig};
use inmo_gateway::http::build_router;
use inmo_gateway::AppState;
use tokio::net::TcpListener;
use tower::ServiceExt;

/// A request as seen by a mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path plus query, e.g. `/propiedades?page=2`.
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What a mock backend answers with.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub headers: Vec<(&'static str, &'static str)>,
    pub body: Vec<u8>,
    pub delay: Option<Duration>,
}

impl Reply {
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json",
            headers: Vec::new(),
            body: value.to_string().into_bytes(),
            delay: None,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            headers: Vec::new(),
            body: body.as_bytes().to_vec(),
            delay: None,
        }
    }

    /// A gzip-framed JSON reply, as a compressing server sends it.
    pub fn gzip(status: u16) -> Self {
        Self {
            status,
            content_type: "application/json",
            headers: vec![("content-encoding", "gzip")],
            body: vec![0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x03, 0xab, 0xae, 0x05, 0x00],
            delay: None,
        }
    }

    /// Answer only after `delay`.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

pub struct MockBackend {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockBackend {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<RecordedRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

/// Start a mock backend that always returns the same reply.
pub async fn start_backend(reply: Reply) -> MockBackend {
    start_programmable_backend(move |_| reply.clone()).await
}

/// Start a programmable mock backend on an ephemeral port. Every request is
/// recorded before `f` decides the reply.
pub async fn start_programmable_backend<F>(f: F) -> MockBackend
where
    F: Fn(&RecordedRequest) -> Reply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let f = Arc::new(f);

    let recorder = calls.clone();
    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let recorder = recorder.clone();
            let f = f.clone();
            async move {
                let recorded = RecordedRequest {
                    method,
                    uri: uri
                        .path_and_query()
                        .map(|pq| pq.as_str().to_string())
                        .unwrap_or_default(),
                    headers,
                    body,
                };
                let reply = f(&recorded);
                recorder.lock().unwrap().push(recorded);
                if let Some(delay) = reply.delay {
                    tokio::time::sleep(delay).await;
                }

                let mut response = Response::new(Body::from(reply.body));
                *response.status_mut() = StatusCode::from_u16(reply.status).unwrap();
                let headers = response.headers_mut();
                headers.insert(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static(reply.content_type),
                );
                for (name, value) in reply.headers {
                    headers.insert(name, HeaderValue::from_static(value));
                }
                response
            }
        },
    );

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, calls }
}

/// A URL nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Configuration with the given service and lookup URLs and nothing else.
pub fn config_with(services: &[(&str, &str)], lookups: &[(&str, &str)]) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    for (key, url) in services {
        config
            .services
            .endpoints
            .insert(key.to_string(), url.to_string());
    }
    for (key, url) in lookups {
        config
            .services
            .lookups
            .insert(key.to_string(), url.to_string());
    }
    config.timeouts.upstream_secs = 5;
    config
}

/// The public gateway router over `config`.
pub fn gateway(config: GatewayConfig) -> (Router, AppState) {
    let request_secs = config.timeouts.request_secs;
    let state = AppState::new(config, ConfigSource::default()).unwrap();
    (build_router(state.clone(), request_secs), state)
}

/// Drive one request through `router`.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Bytes) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body)
}

pub fn json(body: &Bytes) -> serde_json::Value {
    serde_json::from_slice(body).unwrap()
}
