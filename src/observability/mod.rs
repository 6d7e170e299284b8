//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers, catalog helpers, config reloads produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID (x-request-id) is logged with every forwarded call
//! - Metric labels use the service key, never the raw query

pub mod logging;
pub mod metrics;
