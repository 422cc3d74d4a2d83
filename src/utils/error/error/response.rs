//! Structured error values handed back to callers
//!
//! Front ends (dashboards, CLIs) render these instead of matching on variants.

use super::types::EngineError;
use serde::Serialize;

impl EngineError {
    /// Stable machine-readable code for the error
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::Config(_) => "CONFIG_ERROR",
            EngineError::NotFound(_) => "JOB_NOT_FOUND",
            EngineError::JobNotFinished { .. } => "JOB_NOT_FINISHED",
            EngineError::InvalidRequest(_) => "INVALID_REQUEST",
            EngineError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            EngineError::NotCoalescible(_) => "NOT_COALESCIBLE",
            EngineError::Export(_) | EngineError::Csv(_) | EngineError::Xlsx(_) => "EXPORT_ERROR",
            EngineError::Io(_) => "IO_ERROR",
            EngineError::Serialization(_) | EngineError::Yaml(_) => "SERIALIZATION_ERROR",
            EngineError::Logging(_) => "LOGGING_ERROR",
            EngineError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Build the structured error value for a caller
    pub fn to_response(&self, job_id: Option<&str>) -> ErrorResponse {
        ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
                timestamp: chrono::Utc::now().timestamp(),
                job_id: job_id.map(str::to_string),
            },
        }
    }
}

/// Standard error response format
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    pub job_id: Option<String>,
}
