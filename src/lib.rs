//! # batchflow
//!
//! An in-process batch job engine. Large inputs (table rows or file paths)
//! are split into chunks, a caller-supplied processor runs over them on a
//! bounded worker pool, and every job can be polled for progress, partial
//! failures and results, or exported to JSON, CSV or XLSX.
//!
//! ## Features
//!
//! - **Chunked execution**: ordered, bounded chunks with per-chunk failure isolation
//! - **Two concurrency modes**: shared blocking threads or one isolated thread per unit
//! - **Pool scopes**: one pool per job, or a fresh pool per chunk
//! - **Job tracking**: status, progress, errors and results, queried without blocking
//! - **Streaming**: lazy chunk-by-chunk processing of unbounded sources
//! - **Export**: structured text, delimited text and spreadsheets
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use batchflow::{BatchEngine, Config, JobOptions, Outcome, ProcessorArgs, Table};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     batchflow::init_logging(&config.logging)?;
//!
//!     let engine = BatchEngine::new(config.engine)?;
//!     let table = Table::new(vec!["url".into()]);
//!
//!     let job_id = engine.submit_dataframe_job(
//!         table,
//!         |chunk: &Table, _: &ProcessorArgs| -> anyhow::Result<Outcome> {
//!             Ok(Outcome::from(chunk.len()))
//!         },
//!         JobOptions::new().with_chunk_size(500),
//!     )?;
//!
//!     let snapshot = engine.wait_for_job(&job_id, Duration::from_millis(100)).await?;
//!     println!("{} finished with {} errors", snapshot.name, snapshot.errors.len());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::{Config, EngineConfig, LogFormat, LoggingConfig};
pub use core::batch::{
    BatchEngine, CancelOutcome, ConcurrencyMode, ErrorRecord, ExportFormat, ExportReport,
    FnProcessor, ItemProcessor, JobId, JobKind, JobOptions, JobResults, JobSettings, JobSnapshot,
    JobStatus, JobSummary, Outcome, PoolScope, Processor, ProcessorArgs, ResultEntry,
    StreamOutcome, StreamProcessor, Table, UnitFailure,
};
pub use utils::error::{EngineError, Result};
pub use utils::logging::init_logging;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
