//! Engine and logging configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;
use tracing_subscriber::EnvFilter;

impl Validate for EngineConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating engine configuration");

        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }

        if self.max_workers == Some(0) {
            return Err("max_workers must be greater than 0".to_string());
        }

        if self.list_limit == 0 {
            return Err("list_limit must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating logging configuration");

        if self.level.trim().is_empty() {
            return Err("Log level cannot be empty".to_string());
        }

        EnvFilter::try_new(&self.level)
            .map_err(|e| format!("Invalid log level '{}': {}", self.level, e))?;

        if self.file_enabled && self.log_dir.as_os_str().is_empty() {
            return Err("log_dir cannot be empty when file logging is enabled".to_string());
        }

        Ok(())
    }
}
