use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Prefix of every environment variable read by the storefront
pub const ENV_PREFIX: &str = "STOREFRONT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub storage: StorageConfig,
    pub submission: SubmissionConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// File path or http(s) URL of the catalog document
    #[serde(default = "default_catalog_source")]
    pub catalog_source: String,
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,
    /// Scopes the persisted store, one file per origin
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_cart_key")]
    pub cart_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionConfig {
    /// Command that opens a mailto URL; the URL is printed when unset
    #[serde(default)]
    pub mail_opener: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_enable_json_logging")]
    pub enable_json_logging: bool,
}

impl Config {
    pub fn from_environment() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    /// Load every section from `environment` and validate the result
    pub fn from_source(environment: config::Environment) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(environment)
            .build()
            .map_err(|e| ConfigError::LoadError {
                message: format!("Failed to load configuration: {}", e),
            })?;

        let config = Config {
            catalog: deserialize_section(&settings, "catalog")?,
            storage: deserialize_section(&settings, "storage")?,
            submission: deserialize_section(&settings, "submission")?,
            observability: deserialize_section(&settings, "observability")?,
        };

        config.validate()?;

        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.catalog_source.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Catalog source cannot be empty".to_string(),
            });
        }

        if self.catalog.fetch_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "Fetch timeout cannot be 0".to_string(),
            });
        }

        if self.storage.cart_key.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Cart key cannot be empty".to_string(),
            });
        }

        if self.storage.origin.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "Origin cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl CatalogConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                catalog_source: default_catalog_source(),
                fetch_timeout_seconds: default_fetch_timeout(),
            },
            storage: StorageConfig {
                storage_dir: default_storage_dir(),
                origin: default_origin(),
                cart_key: default_cart_key(),
            },
            submission: SubmissionConfig::default(),
            observability: ObservabilityConfig {
                service_name: default_service_name(),
                log_level: default_log_level(),
                enable_json_logging: default_enable_json_logging(),
            },
        }
    }
}

fn deserialize_section<T: DeserializeOwned>(
    settings: &config::Config,
    section: &str,
) -> Result<T, ConfigError> {
    settings
        .clone()
        .try_deserialize()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to deserialize {} config: {}", section, e),
        })
}

// Default value functions
pub(crate) fn default_catalog_source() -> String {
    "data/services.json".to_string()
}

pub(crate) fn default_fetch_timeout() -> u64 {
    10
}

pub(crate) fn default_storage_dir() -> PathBuf {
    PathBuf::from(".storefront")
}

pub(crate) fn default_origin() -> String {
    "localhost".to_string()
}

pub(crate) fn default_cart_key() -> String {
    "portfolio_cart_v1".to_string()
}

pub(crate) fn default_service_name() -> String {
    "storefront".to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_enable_json_logging() -> bool {
    false
}
