//! Environment overlay for service URLs.
//!
//! Service and lookup URLs traditionally live in a `.env` file next to the
//! process. The file is read as plain key/value pairs (the process
//! environment itself is never mutated), then the real environment is laid
//! on top of it.

use std::collections::HashMap;
use std::path::Path;

use crate::config::loader::ConfigError;
use crate::config::schema::GatewayConfig;
use crate::routing::table::{lookup_variable, SERVICE_VARIABLES, WELL_KNOWN_LOOKUPS};

pub type EnvMap = HashMap<String, String>;

const LOOKUP_PREFIXES: &[&str] = &["ESTADO_", "TIPO_"];

/// Read the `.env` file (if present) and overlay the process environment.
pub fn read_environment(env_file: Option<&Path>) -> Result<EnvMap, ConfigError> {
    let mut env = EnvMap::new();

    if let Some(path) = env_file {
        if path.exists() {
            for pair in dotenv::from_path_iter(path).map_err(ConfigError::EnvFile)? {
                let (key, value) = pair.map_err(ConfigError::EnvFile)?;
                env.insert(key, value);
            }
            tracing::debug!(path = ?path, entries = env.len(), "Read env file");
        } else {
            tracing::debug!(path = ?path, "Env file not found, using process environment only");
        }
    }

    env.extend(std::env::vars());
    Ok(env)
}

/// Copy every service and lookup URL found in `env` into the config.
pub fn apply_environment(config: &mut GatewayConfig, env: &EnvMap) {
    for (key, variable) in SERVICE_VARIABLES {
        if let Some(url) = env.get(*variable).filter(|v| !v.trim().is_empty()) {
            config.services.endpoints.insert(key.to_string(), url.clone());
        }
    }

    for key in WELL_KNOWN_LOOKUPS {
        if let Some(url) = env.get(&lookup_variable(key)).filter(|v| !v.trim().is_empty()) {
            config.services.lookups.insert(key.to_string(), url.clone());
        }
    }

    for (variable, url) in env {
        if url.trim().is_empty() {
            continue;
        }
        if let Some(key) = discovered_lookup_key(variable) {
            config.services.lookups.insert(key, url.clone());
        }
    }
}

/// `ESTADO_CAJA_ABIERTA_URL` -> `estado_caja_abierta`.
fn discovered_lookup_key(variable: &str) -> Option<String> {
    let stem = variable.strip_suffix("_URL")?;
    LOOKUP_PREFIXES
        .iter()
        .any(|prefix| stem.starts_with(prefix) && stem.len() > prefix.len())
        .then(|| stem.to_ascii_lowercase())
}
