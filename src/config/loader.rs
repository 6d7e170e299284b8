//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::env::{apply_environment, read_environment, EnvMap};
use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    EnvFile(dotenv::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::EnvFile(e) => write!(f, "Env file error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where a configuration snapshot comes from.
///
/// Kept around after startup so the admin API and the file watcher can
/// rebuild the snapshot from the same inputs.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    /// Optional TOML file.
    pub config_path: Option<PathBuf>,
    /// Optional `.env` file with service URLs.
    pub env_file: Option<PathBuf>,
}

impl ConfigSource {
    pub fn new(config_path: Option<PathBuf>, env_file: Option<PathBuf>) -> Self {
        Self {
            config_path,
            env_file,
        }
    }

    /// Read every input and produce a validated snapshot.
    pub fn load(&self) -> Result<GatewayConfig, ConfigError> {
        let env = read_environment(self.env_file.as_deref())?;
        self.load_with(&env)
    }

    /// Like [`load`](Self::load) with an explicit environment.
    pub fn load_with(&self, env: &EnvMap) -> Result<GatewayConfig, ConfigError> {
        let mut config = match &self.config_path {
            Some(path) => read_config_file(path)?,
            None => GatewayConfig::default(),
        };
        apply_environment(&mut config, env);

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }

    /// Files whose modification should trigger a reload.
    pub fn watched_paths(&self) -> Vec<PathBuf> {
        self.config_path
            .iter()
            .chain(self.env_file.iter())
            .filter(|p| p.exists())
            .cloned()
            .collect()
    }
}

/// Parse a TOML document into a config without validating it.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Load and validate configuration from a TOML file (no environment overlay).
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let config = read_config_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}
