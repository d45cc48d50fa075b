//! Runtime configuration loaded from the environment (and `.env`).

use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::documents::DEFAULT_PAYLOAD_LIMIT;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingVar(&'static str),
    #[error("{name} has invalid value '{value}'")]
    InvalidVar { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub endpoint: String,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub max_payload_bytes: usize,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var("PORT", var("PORT"))?.unwrap_or(8080);
        let max_payload_bytes =
            parse_var("MAX_PAYLOAD_BYTES", var("MAX_PAYLOAD_BYTES"))?.unwrap_or(DEFAULT_PAYLOAD_LIMIT);

        let allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let endpoint = match var("OCI_OBJECT_STORAGE_ENDPOINT") {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => {
                let region = var("OCI_REGION")
                    .or_else(|| var("OCI_RESOURCE_PRINCIPAL_REGION"))
                    .ok_or(ConfigError::MissingVar("OCI_REGION"))?;
                format!("https://objectstorage.{region}.oraclecloud.com")
            }
        };
        let timeout = parse_var::<u64>("OBJECT_STORAGE_TIMEOUT_SECS", var("OBJECT_STORAGE_TIMEOUT_SECS"))?
            .map(Duration::from_secs);

        Ok(Self {
            host,
            port,
            allowed_origins,
            max_payload_bytes,
            storage: StorageConfig { endpoint, timeout },
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
) -> Result<Option<T>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVar { name, value }),
    }
}
