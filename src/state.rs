//! Application state shared by every handler.

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;

use crate::catalog::CatalogService;
use crate::config::{ConfigError, ConfigSource, GatewayConfig};
use crate::observability::metrics;
use crate::routing::ServiceTable;
use crate::upstream::UpstreamClient;

/// One validated configuration and the routing table built from it.
#[derive(Debug)]
pub struct Snapshot {
    pub config: GatewayConfig,
    pub table: ServiceTable,
}

impl Snapshot {
    pub fn new(config: GatewayConfig) -> Self {
        let table = ServiceTable::from_config(&config);
        Self { config, table }
    }
}

#[derive(Clone)]
pub struct AppState {
    /// Current snapshot; swapped whole on reload.
    inner: Arc<ArcSwap<Snapshot>>,
    /// Pooled client for every downstream call.
    pub upstream: UpstreamClient,
    /// Catalog helpers with their page cache.
    pub catalogs: CatalogService,
    /// Inputs the snapshot was built from.
    source: Arc<ConfigSource>,
    started_at: Instant,
}

impl AppState {
    pub fn new(config: GatewayConfig, source: ConfigSource) -> Result<Self, reqwest::Error> {
        let upstream = UpstreamClient::new(&config.timeouts)?;
        let catalogs = CatalogService::new(upstream.clone());
        Ok(Self {
            inner: Arc::new(ArcSwap::from_pointee(Snapshot::new(config))),
            upstream,
            catalogs,
            source: Arc::new(source),
            started_at: Instant::now(),
        })
    }

    /// The snapshot in effect right now. Holding it keeps one request on a
    /// single, consistent configuration even if a reload lands meanwhile.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.load_full()
    }

    /// Replace the running configuration.
    pub fn apply(&self, config: GatewayConfig) {
        let snapshot = Snapshot::new(config);
        tracing::info!(
            configured_services = snapshot.table.configured_count(),
            "Configuration applied"
        );
        self.inner.store(Arc::new(snapshot));
        metrics::record_reload("applied");
    }

    /// Rebuild the configuration from its sources and apply it. On failure
    /// the current configuration stays in place.
    pub fn reload(&self) -> Result<Arc<Snapshot>, ConfigError> {
        match self.source.load() {
            Ok(config) => {
                self.apply(config);
                Ok(self.snapshot())
            }
            Err(e) => {
                tracing::error!(error = %e, "Reload rejected, keeping current configuration");
                metrics::record_reload("rejected");
                Err(e)
            }
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
