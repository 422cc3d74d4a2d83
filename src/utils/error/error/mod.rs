//! Error handling for the batch engine
//!
//! This module defines all error types used throughout the engine.

mod conversions;
mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{EngineError, Result};
