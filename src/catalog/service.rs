//! Catalog reads and writes against the owning services.
//!
//! Reads never fail: a fresh cached page, the downstream page, a stale
//! cached page or the empty page, in that order. Cached pages are keyed by
//! the caller's credentials, and a 401/403 never falls back to a stale
//! page. Writes propagate every error so the caller can show it.

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::Value;

use crate::catalog::cache::{CatalogCache, Credentials, PageKey};
use crate::catalog::kind::CatalogKind;
use crate::catalog::page::{normalize, Paginated};
use crate::error::{GatewayError, Result};
use crate::http::response::json_or_text;
use crate::observability::metrics;
use crate::routing::ProxyQuery;
use crate::state::Snapshot;
use crate::upstream::{UpstreamClient, UpstreamRequest, UpstreamResponse};

#[derive(Clone)]
pub struct CatalogService {
    upstream: UpstreamClient,
    cache: CatalogCache,
}

impl CatalogService {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self {
            upstream,
            cache: CatalogCache::new(),
        }
    }

    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }

    /// One page of a catalog. Never fails.
    pub async fn list(
        &self,
        snapshot: &Snapshot,
        kind: CatalogKind,
        page: u32,
        per_page: u32,
        headers: &HeaderMap,
    ) -> Paginated<Value> {
        let key = PageKey {
            kind,
            page,
            per_page,
            credentials: Credentials::of(headers),
        };
        let caching = snapshot.config.cache.enabled;
        let ttl = Duration::from_secs(snapshot.config.cache.catalog_ttl_secs);

        if caching {
            if let Some(cached) = self.cache.fresh(&key, ttl) {
                metrics::record_cache_event("hit");
                return cached;
            }
        }

        match self.fetch_page(snapshot, kind, page, per_page, headers).await {
            Ok(fetched) => {
                metrics::record_cache_event("miss");
                if caching {
                    self.cache.store(key, fetched.clone());
                }
                fetched
            }
            Err(e) => {
                tracing::warn!(catalog = %kind, page, per_page, error = %e, "Catalog fetch failed, serving fallback");
                let serve_stale = caching && !is_access_denied(&e);
                match serve_stale.then(|| self.cache.stale(&key)).flatten() {
                    Some(stale) => {
                        metrics::record_cache_event("stale");
                        stale
                    }
                    None => {
                        metrics::record_cache_event("empty");
                        Paginated::empty(page, per_page)
                    }
                }
            }
        }
    }

    /// A single entry.
    pub async fn get(
        &self,
        snapshot: &Snapshot,
        kind: CatalogKind,
        id: &str,
        headers: &HeaderMap,
    ) -> Result<Value> {
        let response = self
            .call(snapshot, kind, Method::GET, Some(id), headers, None)
            .await?;
        Ok(json_or_text(&response.body))
    }

    pub async fn create(
        &self,
        snapshot: &Snapshot,
        kind: CatalogKind,
        body: &Value,
        headers: &HeaderMap,
    ) -> Result<Value> {
        self.write(snapshot, kind, Method::POST, None, headers, Some(body))
            .await
    }

    pub async fn update(
        &self,
        snapshot: &Snapshot,
        kind: CatalogKind,
        id: &str,
        body: &Value,
        headers: &HeaderMap,
    ) -> Result<Value> {
        self.write(snapshot, kind, Method::PUT, Some(id), headers, Some(body))
            .await
    }

    pub async fn delete(
        &self,
        snapshot: &Snapshot,
        kind: CatalogKind,
        id: &str,
        headers: &HeaderMap,
    ) -> Result<Value> {
        self.write(snapshot, kind, Method::DELETE, Some(id), headers, None)
            .await
    }

    async fn write(
        &self,
        snapshot: &Snapshot,
        kind: CatalogKind,
        method: Method,
        id: Option<&str>,
        headers: &HeaderMap,
        body: Option<&Value>,
    ) -> Result<Value> {
        let response = self.call(snapshot, kind, method, id, headers, body).await?;
        self.cache.invalidate(kind);
        if response.body.is_empty() {
            return Ok(Value::Null);
        }
        Ok(json_or_text(&response.body))
    }

    async fn fetch_page(
        &self,
        snapshot: &Snapshot,
        kind: CatalogKind,
        page: u32,
        per_page: u32,
        headers: &HeaderMap,
    ) -> Result<Paginated<Value>> {
        let query = ProxyQuery {
            service: None,
            segments: vec![kind.resource().to_string()],
            params: vec![
                ("page".to_string(), page.to_string()),
                ("limit".to_string(), per_page.to_string()),
            ],
        };
        let url = query.target_url(snapshot.table.base_url(kind.service())?)?;
        let response = self
            .upstream
            .send(UpstreamRequest {
                headers: headers.clone(),
                ..UpstreamRequest::get(url, upstream_timeout(snapshot))
            })
            .await?;
        let response = require_success(response)?;

        let body: Value = serde_json::from_slice(&response.body)
            .map_err(|e| GatewayError::Internal(format!("catalog {kind} returned non-JSON body: {e}")))?;
        normalize(body, page, per_page)
            .ok_or_else(|| GatewayError::Internal(format!("catalog {kind} returned an unexpected shape")))
    }

    async fn call(
        &self,
        snapshot: &Snapshot,
        kind: CatalogKind,
        method: Method,
        id: Option<&str>,
        headers: &HeaderMap,
        body: Option<&Value>,
    ) -> Result<UpstreamResponse> {
        let mut segments = vec![kind.resource().to_string()];
        segments.extend(id.map(str::to_string));
        let query = ProxyQuery {
            service: None,
            segments,
            params: Vec::new(),
        };
        let url = query.target_url(snapshot.table.base_url(kind.service())?)?;

        let mut headers = headers.clone();
        let body = match body {
            Some(value) => {
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
                let encoded = serde_json::to_vec(value)
                    .map_err(|e| GatewayError::Internal(e.to_string()))?;
                Some(Bytes::from(encoded))
            }
            None => None,
        };

        tracing::info!(catalog = %kind, method = %method, target = %url, "Catalog call");
        let response = self
            .upstream
            .send(UpstreamRequest {
                method,
                url,
                headers,
                body,
                timeout: upstream_timeout(snapshot),
            })
            .await?;
        require_success(response)
    }
}

fn upstream_timeout(snapshot: &Snapshot) -> Duration {
    Duration::from_secs(snapshot.config.timeouts.upstream_secs)
}

/// The service refused these credentials; nothing cached may stand in.
fn is_access_denied(err: &GatewayError) -> bool {
    matches!(
        err,
        GatewayError::UpstreamStatus { status, .. }
            if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
    )
}

fn require_success(response: UpstreamResponse) -> Result<UpstreamResponse> {
    if response.status.is_success() {
        Ok(response)
    } else {
        Err(GatewayError::UpstreamStatus {
            status: response.status,
            body: json_or_text(&response.body),
        })
    }
}
