//! API gateway for the real-estate back office.
//!
//! One endpoint, `/api/proxy?service=<key>`, fans out to the backend
//! microservices (auth, caja, inmobiliaria, archivos, atencion, planes,
//! ventas, config) and to single-URL lookup services. Catalog helpers under
//! `/api/catalogs` add paging and a tolerant fallback on top.

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;
pub mod upstream;

// Features
pub mod admin;
pub mod catalog;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod state;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
pub use state::AppState;
