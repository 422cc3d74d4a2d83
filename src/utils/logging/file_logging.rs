use crate::utils::error::{EngineError, Result};
use std::fs::{self, File, OpenOptions};
use std::path::Path;

pub struct FileLogging;

impl FileLogging {
    /// Open `log_file_path` for appending, creating its directory first
    pub fn setup_file_logging(log_file_path: &Path) -> Result<File> {
        if let Some(dir) = log_file_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| {
                EngineError::logging(format!(
                    "Failed to create log directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path)
            .map_err(|e| {
                EngineError::logging(format!(
                    "Failed to open log file '{}': {}",
                    log_file_path.display(),
                    e
                ))
            })
    }
}
