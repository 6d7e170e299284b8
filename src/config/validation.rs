//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Service and lookup URLs must be absolute http(s) URLs
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system
//! - Blank URLs are allowed: they mean "known key, not configured"

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::{GatewayConfig, PLACEHOLDER_ADMIN_KEY};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidAddress { field: &'static str, value: String },
    InvalidUrl { key: String, url: String, reason: String },
    ZeroTimeout(&'static str),
    ZeroBodyLimit,
    UnknownLogFormat(String),
    EmptyAdminKey,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidAddress { field, value } => {
                write!(f, "{} is not a socket address: {:?}", field, value)
            }
            ValidationError::InvalidUrl { key, url, reason } => {
                write!(f, "URL for '{}' is invalid ({}): {:?}", key, reason, url)
            }
            ValidationError::ZeroTimeout(field) => write!(f, "timeouts.{} must be > 0", field),
            ValidationError::ZeroBodyLimit => write!(f, "security.max_body_size must be > 0"),
            ValidationError::UnknownLogFormat(v) => {
                write!(f, "observability.log_format must be \"pretty\" or \"json\", got {:?}", v)
            }
            ValidationError::EmptyAdminKey => write!(f, "admin.api_key must not be empty"),
        }
    }
}

pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.admin.enabled {
        check_address(&mut errors, "admin.bind_address", &config.admin.bind_address);
        if config.admin.api_key.trim().is_empty() {
            errors.push(ValidationError::EmptyAdminKey);
        } else if config.admin.api_key == PLACEHOLDER_ADMIN_KEY {
            tracing::warn!("admin.api_key is the placeholder value; set a real key");
        }
    }
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    let urls = config
        .services
        .endpoints
        .iter()
        .chain(config.services.lookups.iter());
    for (key, url) in urls {
        if url.trim().is_empty() {
            continue;
        }
        if let Err(reason) = check_url(url.trim()) {
            errors.push(ValidationError::InvalidUrl {
                key: key.clone(),
                url: url.clone(),
                reason,
            });
        }
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("request_secs", timeouts.request_secs),
        ("connect_secs", timeouts.connect_secs),
        ("upstream_secs", timeouts.upstream_secs),
        ("login_secs", timeouts.login_secs),
        ("logout_secs", timeouts.logout_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroTimeout(field));
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    match config.observability.log_format.as_str() {
        "pretty" | "json" => {}
        other => errors.push(ValidationError::UnknownLogFormat(other.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(url: &str) -> Result<(), String> {
    let parsed = Url::parse(url).map_err(|e| e.to_string())?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme {other}")),
    }
    if parsed.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
