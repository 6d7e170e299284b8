//! Catalog page caching.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::{header, HeaderMap};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::catalog::kind::CatalogKind;
use crate::catalog::page::Paginated;
use crate::observability::metrics;

/// SHA-256 over the caller's `Authorization` and `Cookie` headers.
///
/// Pages are only ever shared between callers presenting the same
/// credentials; anonymous callers share the fingerprint of no headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Credentials([u8; 32]);

impl Credentials {
    pub fn of(headers: &HeaderMap) -> Self {
        let mut hasher = Sha256::new();
        for name in [header::AUTHORIZATION, header::COOKIE] {
            for value in headers.get_all(&name) {
                hasher.update(name.as_str().as_bytes());
                hasher.update(b":");
                hasher.update(value.as_bytes());
                hasher.update(b"\n");
            }
        }
        Self(hasher.finalize().into())
    }
}

/// One cached page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageKey {
    pub kind: CatalogKind,
    pub page: u32,
    pub per_page: u32,
    pub credentials: Credentials,
}

#[derive(Debug, Clone)]
struct CachedPage {
    fetched_at: Instant,
    page: Paginated<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheSummary {
    pub entries: usize,
    pub fresh: usize,
    pub stale: usize,
}

/// A thread-safe cache of catalog pages.
///
/// Entries are never evicted by age: a stale page is still the best answer
/// when the owning service is down. Writes to a catalog drop its pages.
#[derive(Clone, Default)]
pub struct CatalogCache {
    inner: Arc<DashMap<PageKey, CachedPage>>,
}

impl CatalogCache {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The page if it was fetched less than `ttl` ago.
    pub fn fresh(&self, key: &PageKey, ttl: Duration) -> Option<Paginated<Value>> {
        self.inner
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < ttl)
            .map(|entry| entry.page.clone())
    }

    /// The page regardless of age.
    pub fn stale(&self, key: &PageKey) -> Option<Paginated<Value>> {
        self.inner.get(key).map(|entry| entry.page.clone())
    }

    pub fn store(&self, key: PageKey, page: Paginated<Value>) {
        self.inner.insert(
            key,
            CachedPage {
                fetched_at: Instant::now(),
                page,
            },
        );
        metrics::record_cache_size(self.inner.len());
    }

    /// Drop every page of one catalog. Returns how many were dropped.
    pub fn invalidate(&self, kind: CatalogKind) -> usize {
        let before = self.inner.len();
        self.inner.retain(|key, _| key.kind != kind);
        let dropped = before.saturating_sub(self.inner.len());
        if dropped > 0 {
            tracing::debug!(catalog = %kind, dropped, "Invalidated cached pages");
        }
        metrics::record_cache_size(self.inner.len());
        dropped
    }

    /// Drop everything. Returns how many pages were dropped.
    pub fn clear(&self) -> usize {
        let dropped = self.inner.len();
        self.inner.clear();
        metrics::record_cache_size(0);
        dropped
    }

    pub fn summary(&self, ttl: Duration) -> CacheSummary {
        let mut fresh = 0;
        let mut stale = 0;
        for entry in self.inner.iter() {
            if entry.value().fetched_at.elapsed() < ttl {
                fresh += 1;
            } else {
                stale += 1;
            }
        }
        CacheSummary {
            entries: fresh + stale,
            fresh,
            stale,
        }
    }
}
