//! Helper functions for creating specific error types

use super::types::EngineError;

impl EngineError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn not_found<S: Into<String>>(job_id: S) -> Self {
        Self::NotFound(job_id.into())
    }

    pub fn invalid_request<S: Into<String>>(message: S) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat(format.into())
    }

    pub fn not_coalescible<S: Into<String>>(message: S) -> Self {
        Self::NotCoalescible(message.into())
    }

    pub fn export<S: Into<String>>(message: S) -> Self {
        Self::Export(message.into())
    }

    pub fn logging<S: Into<String>>(message: S) -> Self {
        Self::Logging(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the error refers to an unknown job
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the error was raised while producing an export file
    pub fn is_export_failure(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_)
                | Self::NotCoalescible(_)
                | Self::Export(_)
                | Self::Csv(_)
                | Self::Xlsx(_)
        )
    }
}
