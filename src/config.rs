//! Layered configuration: an optional TOML file, then `PRODUCT_EDITOR_*` environment
//! variables. Nested keys use a double underscore, e.g.
//! `PRODUCT_EDITOR_DATA_SERVICE__BACKEND=rest`.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use secrecy::Secret;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "product-editor.toml";
pub const ENV_PREFIX: &str = "PRODUCT_EDITOR_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// Which data service backs the editor.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum DataServiceConfig {
    Memory(MemoryConfig),
    Rest(RestConfig),
}

impl Default for DataServiceConfig {
    fn default() -> Self {
        DataServiceConfig::Memory(MemoryConfig::default())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_buffer_size() -> usize {
    32
}

/// Hosted PostgREST-style endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    pub url: String,
    pub api_key: Secret<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Behaviour switches for [`ProductEditor`](crate::editor::ProductEditor).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EditorConfig {
    /// Delete the freshly inserted product when its price-history insert fails.
    #[serde(default)]
    pub compensate_failed_create: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data_service: DataServiceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub editor: EditorConfig,
}

impl AppConfig {
    /// Loads `product-editor.toml` from the working directory, if present, then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(path).extract()?;
        Ok(config)
    }

    /// The provider stack, file first so the environment wins.
    pub fn figment(path: impl AsRef<Path>) -> Figment {
        Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}
