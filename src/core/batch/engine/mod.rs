//! Batch engine
//!
//! - `core`: the `BatchEngine` handle and the submission API
//! - `options`: per-job submission options
//! - `validation`: option checks and settings resolution
//! - `execution`: the per-job supervisor
//! - `query`: status, listing, results, cancellation and export

mod core;
mod execution;
mod options;
mod query;
mod validation;

pub use self::core::BatchEngine;
pub use options::JobOptions;
