//! Logging configuration

use super::*;
use crate::config::env::{get_env_var, parse_env_var};
use crate::utils::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Console output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(EngineError::config(format!("Unknown log format: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
    /// Directory holding `batch_processor.log`
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// Write the plain-text log file
    #[serde(default = "default_true")]
    pub file_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: default_log_dir(),
            file_enabled: true,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            level: get_env_var("BATCH_LOG_LEVEL").unwrap_or(defaults.level),
            format: parse_env_var("BATCH_LOG_FORMAT")?.unwrap_or(defaults.format),
            log_dir: get_env_var("BATCH_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            file_enabled: defaults.file_enabled,
        })
    }

    /// Path of the log file
    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("batch_processor.log")
    }
}
