//! Batch job engine
//!
//! Splits large inputs (table rows or file paths) into chunks, runs a
//! caller-supplied processor over them on a bounded worker pool, and keeps
//! per-job progress, results and errors for polling.

mod chunker;
mod collector;
mod engine;
mod export;
mod outcome;
mod pool;
mod processor;
mod record;
mod registry;
mod streaming;
mod table;
mod types;


// Re-export all public types
pub use chunker::{Chunk, Chunkable, chunk, chunk_count};
pub use engine::{BatchEngine, JobOptions};
pub use export::ExportFormat;
pub use outcome::Outcome;
pub use processor::{FnProcessor, ItemProcessor, Processor, ProcessorArgs, UnitFailure};
pub use streaming::{StreamOutcome, StreamProcessor};
pub use table::{Table, coalesce};
pub use types::{
    CancelOutcome, ConcurrencyMode, ErrorRecord, ExportReport, JobId, JobKind, JobResults,
    JobSettings, JobSnapshot, JobStatus, JobSummary, PoolScope, ResultEntry,
};
