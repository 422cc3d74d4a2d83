//! Configuration management for the batch engine
//!
//! Configuration is read from a YAML or JSON file, or from `BATCH_*`
//! environment variables, and validated before use.

pub mod env;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Engine defaults
    #[serde(default)]
    pub engine: EngineConfig,
    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a file; `.json` is parsed as JSON, anything else as YAML
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| EngineError::Config(format!("Failed to read config file: {}", e)))?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let config: Config = if is_json {
            serde_json::from_str(&content)
                .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| EngineError::Config(format!("Failed to parse config: {}", e)))?
        };

        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables, after reading `.env` if present
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        env::load_dotenv();

        let config = Self {
            engine: EngineConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.engine
            .validate()
            .map_err(|e| EngineError::Config(format!("Engine config error: {}", e)))?;

        self.logging
            .validate()
            .map_err(|e| EngineError::Config(format!("Logging config error: {}", e)))?;

        Ok(())
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| EngineError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
