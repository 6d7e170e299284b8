//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): proxied requests by service, method, status
//! - `gateway_request_duration_seconds` (histogram): latency by service
//! - `gateway_catalog_cache_total` (counter): hit / miss / stale / empty
//! - `gateway_catalog_cache_entries` (gauge): cached catalog pages
//! - `gateway_config_reloads_total` (counter): applied / rejected
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(service: &str, method: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "service" => service.to_string(),
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "service" => service.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_cache_event(event: &'static str) {
    counter!("gateway_catalog_cache_total", "event" => event).increment(1);
}

pub fn record_cache_size(entries: usize) {
    gauge!("gateway_catalog_cache_entries").set(entries as f64);
}

pub fn record_reload(outcome: &'static str) {
    counter!("gateway_config_reloads_total", "outcome" => outcome).increment(1);
}
