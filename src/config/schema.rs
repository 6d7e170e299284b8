//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream service and lookup URLs.
    pub services: ServicesConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Catalog cache settings.
    pub cache: CacheConfig,

    /// Config reload settings.
    pub reload: ReloadConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Downstream endpoints.
///
/// Entries here are the lowest-priority source: the `.env` file and the
/// process environment override them when the matching variable is set.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServicesConfig {
    /// Service key -> base URL (e.g. `inmobiliaria = "http://10.0.0.4:4002"`).
    pub endpoints: BTreeMap<String, String>,

    /// Lookup key -> URL answered with a plain GET.
    pub lookups: BTreeMap<String, String>,
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Inbound request deadline in seconds.
    pub request_secs: u64,

    /// Outbound connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Outbound request timeout in seconds.
    pub upstream_secs: u64,

    /// Deadline for `auth` login calls.
    pub login_secs: u64,

    /// Deadline for `auth` logout calls.
    pub logout_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 60,
            connect_secs: 5,
            upstream_secs: 30,
            login_secs: 10,
            logout_secs: 5,
        }
    }
}

impl TimeoutConfig {
    /// Outbound deadline for a call to `service` whose last path segment
    /// is `last_segment`. Auth login/logout get their own, shorter budgets.
    pub fn upstream_for(&self, service: &str, last_segment: Option<&str>) -> Duration {
        let secs = match (service, last_segment) {
            ("auth", Some("login")) => self.login_secs,
            ("auth", Some("logout")) => self.logout_secs,
            _ => self.upstream_secs,
        };
        Duration::from_secs(secs)
    }
}

/// Catalog cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable catalog caching.
    pub enabled: bool,

    /// How long a fetched catalog page is served without refetching.
    pub catalog_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            catalog_ttl_secs: 300,
        }
    }
}

/// Config reload configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ReloadConfig {
    /// Reload automatically when the config or `.env` file changes.
    /// When off, only `POST /admin/reload` swaps the configuration.
    pub watch_files: bool,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format: "pretty" or "json".
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

pub(crate) const PLACEHOLDER_ADMIN_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: PLACEHOLDER_ADMIN_KEY.to_string(),
            bind_address: "127.0.0.1:3001".to_string(),
        }
    }
}

/// Request hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum forwarded body size in bytes (file uploads included).
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 25 * 1024 * 1024, // 25MB
        }
    }
}
