//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! gateway.toml (optional)      .env + process environment
//!     → loader.rs (parse)          → env.rs (service/lookup URLs)
//!                  ↘              ↙
//!               validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via ArcSwap to all handlers
//!
//! On reload (POST /admin/reload, or watcher.rs when enabled):
//!     ConfigSource::load()
//!     → validate
//!     → atomic swap of the snapshot
//!     → failed reload keeps the current snapshot
//! ```
//!
//! # Design Decisions
//! - Loaded once at startup; never re-read per request
//! - All fields have defaults to allow minimal configs
//! - Environment wins over the `.env` file, both win over TOML

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{ConfigError, ConfigSource};
pub use schema::AdminConfig;
pub use schema::CacheConfig;
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::TimeoutConfig;
