//! Environment variable helpers for configuration loading

use crate::utils::error::{EngineError, Result};
use std::env;
use std::str::FromStr;

/// Load a `.env` file from the working directory if one exists
pub fn load_dotenv() {
    // absent file is the common case
    let _ = dotenvy::dotenv();
}

/// Read a non-empty variable
pub fn get_env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse a variable, failing with a configuration error on a malformed value
pub fn parse_env_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| EngineError::Config(format!("Invalid value for {}: {}", key, e))),
        None => Ok(None),
    }
}
