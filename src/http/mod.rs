//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → cors.rs (reflect Origin, answer OPTIONS)
//!     → proxy.rs (/api/proxy) | catalog.rs (/api/catalogs)
//!         → request.rs (headers to forward)
//!         → body.rs (buffer body for non-GET/HEAD)
//!         → upstream client
//!         → response.rs (relay status + JSON/raw body)
//!     → Send to client
//! ```

pub mod body;
pub mod catalog;
pub mod cors;
pub mod proxy;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{build_router, GatewayServer};
