//! Batch job types and data structures

use super::outcome::Outcome;
use super::table::Table;
use crate::utils::error::EngineError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque job identifier (UUID v4)
pub type JobId = String;

/// Job lifecycle status
///
/// `Initializing -> Running -> {Completed, Failed, Cancelled}`; the last three are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Record created, input not yet partitioned
    Initializing,
    /// Units are being submitted to the worker pool
    Running,
    /// Every submitted unit produced an outcome
    Completed,
    /// The supervision loop itself failed
    Failed,
    /// Cancellation was accepted
    Cancelled,
}

impl JobStatus {
    /// Whether no further transition can leave this status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Initializing => "initializing",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "initializing" => Ok(JobStatus::Initializing),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            "cancelled" | "canceled" => Ok(JobStatus::Cancelled),
            other => Err(EngineError::invalid_request(format!(
                "Unknown job status: {}",
                other
            ))),
        }
    }
}

/// Which submission API produced a job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Row chunks of a [`Table`]
    Dataframe,
    /// File paths, processed one file per unit
    FileBatch,
}

impl JobKind {
    /// Prefix for auto-generated job names
    pub(crate) fn name_prefix(&self) -> &'static str {
        match self {
            JobKind::Dataframe => "df_job",
            JobKind::FileBatch => "file_job",
        }
    }
}

/// How units of one job are executed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Shared blocking-thread pool of the runtime
    #[default]
    Threads,
    /// A dedicated OS thread per unit, nothing shared between units
    Isolated,
}

impl FromStr for ConcurrencyMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "threads" | "thread" => Ok(ConcurrencyMode::Threads),
            "isolated" | "processes" | "process" => Ok(ConcurrencyMode::Isolated),
            other => Err(EngineError::invalid_request(format!(
                "Unknown concurrency mode: {}",
                other
            ))),
        }
    }
}

/// Lifetime of the bounded worker pool
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PoolScope {
    /// One pool for the whole job
    Job,
    /// A fresh pool per chunk, drained before the next chunk starts
    Chunk,
}

impl FromStr for PoolScope {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "job" => Ok(PoolScope::Job),
            "chunk" => Ok(PoolScope::Chunk),
            other => Err(EngineError::invalid_request(format!(
                "Unknown pool scope: {}",
                other
            ))),
        }
    }
}

/// Effective execution settings of a job
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobSettings {
    /// Items per chunk
    pub chunk_size: usize,
    /// Maximum units executing at once
    pub max_workers: usize,
    /// Thread or isolated execution
    pub concurrency_mode: ConcurrencyMode,
    /// Pool lifetime
    pub pool_scope: PoolScope,
}

/// One successful unit outcome
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEntry {
    /// Zero-based position of the unit in the original ordering
    pub unit_index: usize,
    /// Whatever the processor returned
    pub outcome: Outcome,
}

/// One failed unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Zero-based position of the unit in the original ordering
    pub unit_index: usize,
    /// File path for file-batch units
    pub file: Option<String>,
    /// Error message
    pub error: String,
    /// Cause chain / panic details
    pub traceback: String,
    /// When the failure was recorded
    pub recorded_at: DateTime<Utc>,
}

/// Full copy of a job record
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub name: String,
    pub kind: JobKind,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Seconds between creation and completion/failure
    pub duration_secs: Option<f64>,
    pub total_units: usize,
    pub completed_units: usize,
    /// `100 * completed_units / total_units`, or 100 for an empty job
    pub progress: f64,
    pub errors: Vec<ErrorRecord>,
    /// In merge order; use `get_results` for index order
    pub results: Vec<ResultEntry>,
    pub processor_name: String,
    pub settings: JobSettings,
    /// Supervision failure message
    pub error: Option<String>,
    /// Supervision failure details
    pub traceback: Option<String>,
}

impl JobSnapshot {
    /// Completed with neither unit errors nor supervision failure
    pub fn is_fully_successful(&self) -> bool {
        self.status == JobStatus::Completed && self.errors.is_empty() && self.error.is_none()
    }
}

/// Simplified list view of a job
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub job_id: JobId,
    pub name: String,
    pub kind: JobKind,
    pub status: JobStatus,
    pub progress: f64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_count: usize,
}

/// Results of a terminal job, sorted by unit index
#[derive(Debug, Clone, PartialEq)]
pub enum JobResults {
    /// One entry per successful unit
    Entries(Vec<ResultEntry>),
    /// Every outcome was a table; rows concatenated in unit order
    Table(Table),
}

impl JobResults {
    /// Outcomes in unit order; a coalesced table yields a single outcome
    pub fn into_outcomes(self) -> Vec<Outcome> {
        match self {
            JobResults::Entries(entries) => entries.into_iter().map(|e| e.outcome).collect(),
            JobResults::Table(table) => vec![Outcome::Table(table)],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            JobResults::Entries(entries) => entries.len(),
            JobResults::Table(table) => table.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Answer to a cancellation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancelOutcome {
    pub job_id: JobId,
    /// Status after the request was handled
    pub status: JobStatus,
    /// Whether this call flipped the status
    pub changed: bool,
    pub message: String,
}

/// Confirmation of a written export
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub job_id: JobId,
    pub path: String,
    pub format: super::export::ExportFormat,
    /// Outcomes (structured text) or rows (tabular) written
    pub records: usize,
    pub message: String,
}
