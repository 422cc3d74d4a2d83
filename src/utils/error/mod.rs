//! Error handling utilities
//!
//! Every fallible engine operation returns [`Result`], carrying an [`EngineError`].

pub mod error;

pub use error::*;
