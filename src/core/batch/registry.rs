//! Job registry
//!
//! Every job record lives in one map behind one `parking_lot::Mutex`. Each
//! method below takes the lock once, for the duration noted, and never
//! across an await point or a processor call:
//!
//! | Operation | Critical section |
//! |---|---|
//! | `create` | insert one record |
//! | `start`, `record_unit_completion`, `cancel` | counter or status update of one record |
//! | `apply` | move one payload into a record, or one terminal transition |
//! | `snapshot`, `results`, `status` | copy out of one record |
//! | `list` | summarise every record, then sort outside the lock |

use super::collector::{CollectorMessage, Terminal};
use super::record::JobRecord;
use super::types::*;
use crate::utils::error::{EngineError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct RegistryInner {
    jobs: HashMap<JobId, JobRecord>,
    next_seq: u64,
}

/// In-memory map from job id to job record
#[derive(Debug, Default)]
pub(crate) struct JobRegistry {
    inner: Mutex<RegistryInner>,
}

impl JobRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a new record in `initializing` and return its id
    pub(crate) fn create(
        &self,
        name: String,
        kind: JobKind,
        processor_name: String,
        settings: JobSettings,
    ) -> JobId {
        let job_id = Uuid::new_v4().to_string();
        let mut inner = self.inner.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.jobs.insert(
            job_id.clone(),
            JobRecord::new(seq, job_id.clone(), name, kind, processor_name, settings),
        );
        job_id
    }

    fn with_job<R>(&self, job_id: &str, f: impl FnOnce(&JobRecord) -> R) -> Result<R> {
        let inner = self.inner.lock();
        inner
            .jobs
            .get(job_id)
            .map(f)
            .ok_or_else(|| EngineError::not_found(job_id))
    }

    fn with_job_mut<R>(&self, job_id: &str, f: impl FnOnce(&mut JobRecord) -> R) -> Result<R> {
        let mut inner = self.inner.lock();
        inner
            .jobs
            .get_mut(job_id)
            .map(f)
            .ok_or_else(|| EngineError::not_found(job_id))
    }

    pub(crate) fn status(&self, job_id: &str) -> Result<JobStatus> {
        self.with_job(job_id, JobRecord::status)
    }

    /// Whether the supervisor should stop submitting new units
    pub(crate) fn should_stop(&self, job_id: &str) -> bool {
        self.status(job_id)
            .map(|status| status.is_terminal())
            .unwrap_or(true)
    }

    pub(crate) fn start(&self, job_id: &str, total_units: usize) -> Result<bool> {
        self.with_job_mut(job_id, |record| record.start(total_units))
    }

    pub(crate) fn record_unit_completion(&self, job_id: &str) -> bool {
        self.with_job_mut(job_id, JobRecord::record_unit_completion)
            .unwrap_or(false)
    }

    pub(crate) fn snapshot(&self, job_id: &str) -> Result<JobSnapshot> {
        self.with_job(job_id, JobRecord::snapshot)
    }

    /// Status, progress and index-sorted results in one critical section
    pub(crate) fn results(&self, job_id: &str) -> Result<(JobStatus, f64, Vec<ResultEntry>)> {
        self.with_job(job_id, |record| {
            (record.status(), record.progress(), record.sorted_results())
        })
    }

    /// Summaries, newest first, optionally filtered by status
    pub(crate) fn list(&self, status_filter: Option<JobStatus>, limit: usize) -> Vec<JobSummary> {
        let mut keyed: Vec<(u64, JobSummary)> = {
            let inner = self.inner.lock();
            inner
                .jobs
                .values()
                .filter(|record| status_filter.is_none_or(|status| record.status() == status))
                .map(|record| (record.seq, record.summary()))
                .collect()
        };

        keyed.sort_by(|(seq_a, a), (seq_b, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| seq_b.cmp(seq_a))
        });
        keyed.into_iter().take(limit).map(|(_, s)| s).collect()
    }

    /// Flip a non-terminal job to `cancelled`; terminal jobs are left untouched
    pub(crate) fn cancel(&self, job_id: &str) -> Result<CancelOutcome> {
        let (status, changed) = self.with_job_mut(job_id, |record| {
            let changed = record.transition(JobStatus::Cancelled);
            (record.status(), changed)
        })?;

        let message = if changed {
            warn!(job_id = %job_id, "Job cancelled");
            "Job cancelled".to_string()
        } else {
            format!("Job already {}", status)
        };

        Ok(CancelOutcome {
            job_id: job_id.to_string(),
            status,
            changed,
            message,
        })
    }

    /// Merge one collector message into its record
    pub(crate) fn apply(&self, message: CollectorMessage) {
        let job_id = message.job_id().to_string();
        let applied = self.with_job_mut(&job_id, |record| match message {
            CollectorMessage::Outcome { entry, .. } => {
                record.push_result(entry);
                None
            }
            CollectorMessage::Error { record: failure, .. } => {
                record.push_error(failure);
                None
            }
            CollectorMessage::Finished { terminal, .. } => {
                let changed = match terminal {
                    Terminal::Completed => record.transition(JobStatus::Completed),
                    Terminal::Failed { error, traceback } => record.fail(error, traceback),
                };
                Some((changed, record.status(), record.errors_len()))
            }
        });

        match applied {
            Ok(Some((true, JobStatus::Failed, _))) => {
                error!(job_id = %job_id, "Batch job failed");
            }
            Ok(Some((true, status, error_count))) => {
                info!(job_id = %job_id, status = %status, errors = error_count, "Batch job finished");
            }
            Ok(_) => {}
            Err(_) => warn!(job_id = %job_id, "Dropping collector message for unknown job"),
        }
    }
}
