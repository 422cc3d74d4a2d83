//! Utility modules for the batch engine
//!
//! - **error**: `EngineError` and the crate `Result` alias
//! - **logging**: tracing subscriber setup (console and log file)

pub mod error;
pub mod logging;
