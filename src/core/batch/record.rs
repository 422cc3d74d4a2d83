//! Job record: the mutable state of one submitted job
//!
//! Records are only touched under the registry lock. Callers never see a
//! `JobRecord`; they get [`JobSnapshot`] or [`JobSummary`] copies.

use super::types::*;
use chrono::{DateTime, Utc};
use tracing::warn;

#[derive(Debug)]
pub(crate) struct JobRecord {
    /// Submission order, used to break `created_at` ties
    pub(crate) seq: u64,
    pub(crate) job_id: JobId,
    pub(crate) name: String,
    pub(crate) kind: JobKind,
    status: JobStatus,
    pub(crate) created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    duration_secs: Option<f64>,
    total_units: usize,
    completed_units: usize,
    errors: Vec<ErrorRecord>,
    results: Vec<ResultEntry>,
    processor_name: String,
    settings: JobSettings,
    error: Option<String>,
    traceback: Option<String>,
}

impl JobRecord {
    pub(crate) fn new(
        seq: u64,
        job_id: JobId,
        name: String,
        kind: JobKind,
        processor_name: String,
        settings: JobSettings,
    ) -> Self {
        Self {
            seq,
            job_id,
            name,
            kind,
            status: JobStatus::Initializing,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            cancelled_at: None,
            duration_secs: None,
            total_units: 0,
            completed_units: 0,
            errors: Vec::new(),
            results: Vec::new(),
            processor_name,
            settings,
            error: None,
            traceback: None,
        }
    }

    pub(crate) fn status(&self) -> JobStatus {
        self.status
    }

    /// Derived from the counters; 100 for a job without units
    pub(crate) fn progress(&self) -> f64 {
        if self.total_units == 0 {
            100.0
        } else {
            self.completed_units as f64 / self.total_units as f64 * 100.0
        }
    }

    /// Move to `to` if that is a forward step; returns whether the status changed
    pub(crate) fn transition(&mut self, to: JobStatus) -> bool {
        if !Self::is_forward(self.status, to) {
            return false;
        }

        let now = Utc::now();
        match to {
            JobStatus::Running => self.started_at = Some(now),
            JobStatus::Completed | JobStatus::Failed => {
                self.completed_at = Some(now);
                self.duration_secs =
                    Some((now - self.created_at).num_microseconds().unwrap_or(0) as f64 / 1e6);
            }
            JobStatus::Cancelled => self.cancelled_at = Some(now),
            JobStatus::Initializing => {}
        }
        self.status = to;
        true
    }

    fn is_forward(from: JobStatus, to: JobStatus) -> bool {
        match from {
            JobStatus::Initializing => to != JobStatus::Initializing,
            JobStatus::Running => to.is_terminal(),
            _ => false,
        }
    }

    /// Fix the unit count and start running; no-op if cancelled meanwhile
    pub(crate) fn start(&mut self, total_units: usize) -> bool {
        if self.status != JobStatus::Initializing {
            return false;
        }
        self.total_units = total_units;
        self.transition(JobStatus::Running)
    }

    /// Count one finished unit; counters are frozen once the job is terminal
    pub(crate) fn record_unit_completion(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        if self.completed_units >= self.total_units {
            warn!(
                job_id = %self.job_id,
                total_units = self.total_units,
                "Unit completion past the unit count ignored"
            );
            return false;
        }
        self.completed_units += 1;
        true
    }

    pub(crate) fn push_result(&mut self, entry: ResultEntry) {
        self.results.push(entry);
    }

    pub(crate) fn push_error(&mut self, record: ErrorRecord) {
        self.errors.push(record);
    }

    pub(crate) fn errors_len(&self) -> usize {
        self.errors.len()
    }

    /// Mark a supervision failure
    pub(crate) fn fail(&mut self, error: String, traceback: String) -> bool {
        if !self.transition(JobStatus::Failed) {
            return false;
        }
        self.error = Some(error);
        self.traceback = Some(traceback);
        true
    }

    /// Result entries sorted by unit index
    pub(crate) fn sorted_results(&self) -> Vec<ResultEntry> {
        let mut results = self.results.clone();
        results.sort_by_key(|entry| entry.unit_index);
        results
    }

    /// Results and errors are both ordered by unit index
    pub(crate) fn snapshot(&self) -> JobSnapshot {
        let mut errors = self.errors.clone();
        errors.sort_by_key(|record| record.unit_index);

        JobSnapshot {
            job_id: self.job_id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            status: self.status,
            created_at: self.created_at,
            started_at: self.started_at,
            completed_at: self.completed_at,
            cancelled_at: self.cancelled_at,
            duration_secs: self.duration_secs,
            total_units: self.total_units,
            completed_units: self.completed_units,
            progress: self.progress(),
            errors,
            results: self.sorted_results(),
            processor_name: self.processor_name.clone(),
            settings: self.settings.clone(),
            error: self.error.clone(),
            traceback: self.traceback.clone(),
        }
    }

    pub(crate) fn summary(&self) -> JobSummary {
        JobSummary {
            job_id: self.job_id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            status: self.status,
            progress: self.progress(),
            created_at: self.created_at,
            completed_at: self.completed_at,
            error_count: self.errors.len(),
        }
    }
}
