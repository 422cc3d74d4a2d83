//! Error types for the batch engine

use crate::core::batch::JobStatus;
use thiserror::Error;

/// Result type alias for the engine
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for the engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unknown job identifier
    #[error("Job not found: {0}")]
    NotFound(String),

    /// Results were requested before the job reached a terminal state
    #[error("Job {job_id} is still {status} ({progress:.1}% complete)")]
    JobNotFinished {
        job_id: String,
        status: JobStatus,
        progress: f64,
    },

    /// Invalid submission or query arguments
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Export format not supported
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Outcomes could not be combined into one table
    #[error("Results cannot be coalesced into a table: {0}")]
    NotCoalescible(String),

    /// Export failures that are not I/O or encoder errors
    #[error("Export error: {0}")]
    Export(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Delimited-text encoder errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet encoder errors
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
