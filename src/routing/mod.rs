//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/proxy?service=inmobiliaria&path=propiedades&page=2
//!     → target.rs (split service / path segments / forwarded params)
//!     → table.rs (service key → base URL or lookup URL)
//!     → Return: Destination or a 400-class GatewayError
//! ```
//!
//! # Design Decisions
//! - Table rebuilt from config on reload, immutable at runtime
//! - Unconfigured keys never produce a target URL
//! - Deterministic: same query always yields the same target

pub mod table;
pub mod target;

pub use table::{Destination, ServiceTable};
pub use target::ProxyQuery;
