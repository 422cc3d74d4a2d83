//! Type conversions for EngineError

use super::types::EngineError;

impl From<tokio::task::JoinError> for EngineError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            EngineError::Internal(format!("Worker task was cancelled: {}", err))
        } else {
            EngineError::Internal(format!("Worker task failed: {}", err))
        }
    }
}

impl From<tracing_subscriber::util::TryInitError> for EngineError {
    fn from(err: tracing_subscriber::util::TryInitError) -> Self {
        EngineError::Logging(err.to_string())
    }
}

impl From<tracing_subscriber::filter::ParseError> for EngineError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        EngineError::Config(format!("Invalid log filter: {}", err))
    }
}
