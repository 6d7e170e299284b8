//! Service routing table.
//!
//! # Responsibilities
//! - Know every service key the front end may send
//! - Resolve a key to a downstream base URL or a lookup URL
//! - Distinguish "unknown key" from "known but not configured"
//!
//! # Design Decisions
//! - Built once per config snapshot, immutable afterwards
//! - Lookup keys are checked before service keys
//! - Exact, case-sensitive key match

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

/// Service keys and the environment variable holding their base URL.
pub const SERVICE_VARIABLES: &[(&str, &str)] = &[
    ("auth", "AUTH_SERVICE_URL"),
    ("caja", "CAJA_SERVICE_URL"),
    ("inmobiliaria", "INMOBILIARIA_SERVICE_URL"),
    ("archivos", "ARCHIVOS_SERVICE_URL"),
    ("files", "ARCHIVOS_SERVICE_URL"),
    ("atencion", "ATENCION_SERVICE_URL"),
    ("planes", "PLAN_PAGOS_SERVICE_URL"),
    ("ventas", "VENTA_SERVICE_URL"),
    ("config", "CONFIG_SERVICE_URL"),
];

/// Lookup keys recognized even when no URL is configured for them.
pub const WELL_KNOWN_LOOKUPS: &[&str] = &[
    "estado_caja_abierta",
    "estado_caja_cerrada",
    "tipo_movimiento_ingreso",
    "tipo_movimiento_egreso",
    "tipo_pago_efectivo",
    "estado_propiedad_disponible",
    "estado_propiedad_reservada",
    "estado_propiedad_vendida",
    "canales_comunicacion_presencial_url",
];

/// Environment variable holding the URL of a lookup key.
pub fn lookup_variable(key: &str) -> String {
    let upper = key.to_ascii_uppercase();
    if upper.ends_with("_URL") {
        upper
    } else {
        format!("{upper}_URL")
    }
}

/// Where a request for a service key goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination<'a> {
    /// Regular service: path and query are appended to the base URL.
    Service { key: &'a str, base_url: &'a str },
    /// Lookup: always a plain GET to the URL.
    Lookup { key: &'a str, url: &'a str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Service,
    Lookup,
}

/// A row of the routing table, for the admin API.
#[derive(Debug, Clone, Serialize)]
pub struct TableEntry {
    pub key: String,
    pub kind: EntryKind,
    pub url: Option<String>,
}

/// Service key -> URL mapping for one config snapshot.
#[derive(Debug, Clone, Default)]
pub struct ServiceTable {
    services: BTreeMap<String, Option<String>>,
    lookups: BTreeMap<String, Option<String>>,
}

impl ServiceTable {
    /// Build the table from a validated configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        let mut services: BTreeMap<String, Option<String>> = SERVICE_VARIABLES
            .iter()
            .map(|(key, _)| (key.to_string(), None))
            .collect();
        for (key, url) in &config.services.endpoints {
            services.insert(key.clone(), non_empty(url));
        }

        let mut lookups: BTreeMap<String, Option<String>> = WELL_KNOWN_LOOKUPS
            .iter()
            .map(|key| (key.to_string(), None))
            .collect();
        for (key, url) in &config.services.lookups {
            lookups.insert(key.clone(), non_empty(url));
        }

        Self { services, lookups }
    }

    /// Resolve the `service` query parameter.
    pub fn resolve(&self, key: Option<&str>) -> Result<Destination<'_>> {
        let key = match key.map(str::trim) {
            Some(k) if !k.is_empty() => k,
            _ => return Err(GatewayError::MissingService),
        };

        if let Some((key, url)) = self.lookups.get_key_value(key) {
            return match url {
                Some(url) => Ok(Destination::Lookup { key, url }),
                None => Err(GatewayError::UnconfiguredService(key.clone())),
            };
        }

        match self.services.get_key_value(key) {
            Some((key, Some(base_url))) => Ok(Destination::Service { key, base_url }),
            Some((key, None)) => Err(GatewayError::UnconfiguredService(key.clone())),
            None => Err(GatewayError::UnknownService(key.to_string())),
        }
    }

    /// Base URL of a regular service.
    pub fn base_url(&self, key: &str) -> Result<&str> {
        match self.resolve(Some(key))? {
            Destination::Service { base_url, .. } => Ok(base_url),
            Destination::Lookup { key, .. } => Err(GatewayError::UnknownService(key.to_string())),
        }
    }

    /// All rows, services first.
    pub fn entries(&self) -> Vec<TableEntry> {
        let services = self.services.iter().map(|(key, url)| TableEntry {
            key: key.clone(),
            kind: EntryKind::Service,
            url: url.clone(),
        });
        let lookups = self.lookups.iter().map(|(key, url)| TableEntry {
            key: key.clone(),
            kind: EntryKind::Lookup,
            url: url.clone(),
        });
        services.chain(lookups).collect()
    }

    /// Number of keys with a URL.
    pub fn configured_count(&self) -> usize {
        self.services
            .values()
            .chain(self.lookups.values())
            .filter(|url| url.is_some())
            .count()
    }
}

fn non_empty(url: &str) -> Option<String> {
    let trimmed = url.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
