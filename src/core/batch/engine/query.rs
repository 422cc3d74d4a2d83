//! Query API: status, listing, results, cancellation and export
//!
//! None of these wait on job work; each copies what it needs out of the
//! registry in one short critical section.

use super::core::BatchEngine;
use crate::core::batch::export::{ExportFormat, write_export};
use crate::core::batch::table::coalesce;
use crate::core::batch::types::*;
use crate::utils::error::{EngineError, Result};
use std::path::Path;
use std::time::Duration;
use tracing::info;

impl BatchEngine {
    /// Full snapshot of a job
    pub fn get_status(&self, job_id: &str) -> Result<JobSnapshot> {
        self.registry.snapshot(job_id)
    }

    /// Job summaries, newest first; `limit` defaults to the configured list limit
    pub fn list_jobs(&self, status_filter: Option<JobStatus>, limit: Option<usize>) -> Vec<JobSummary> {
        self.registry
            .list(status_filter, limit.unwrap_or(self.config.list_limit))
    }

    /// Results of a terminal job, sorted by unit index
    ///
    /// With `as_table`, results are coalesced into one table when every
    /// outcome is a table; otherwise entries are returned unchanged.
    pub fn get_results(&self, job_id: &str, as_table: bool) -> Result<JobResults> {
        let entries = self.terminal_results(job_id)?;

        let all_tables = !entries.is_empty() && entries.iter().all(|e| e.outcome.as_table().is_some());
        if as_table && all_tables {
            let table = coalesce(entries.iter().map(|e| (e.unit_index, &e.outcome)))?;
            return Ok(JobResults::Table(table));
        }

        Ok(JobResults::Entries(entries))
    }

    /// Request cancellation; idempotent, and a no-op for terminal jobs
    pub fn cancel_job(&self, job_id: &str) -> Result<CancelOutcome> {
        self.registry.cancel(job_id)
    }

    /// Write a terminal job's results to `path`
    pub async fn export_results(
        &self,
        job_id: &str,
        path: impl AsRef<Path>,
        format: ExportFormat,
    ) -> Result<ExportReport> {
        let path = path.as_ref();
        let entries = self.terminal_results(job_id)?;
        let records = write_export(path, &entries, format).await?;

        let path_text = path.display().to_string();
        info!(job_id = %job_id, path = %path_text, %format, records, "Results exported");

        Ok(ExportReport {
            job_id: job_id.to_string(),
            message: format!("Results saved to {}", path_text),
            path: path_text,
            format,
            records,
        })
    }

    /// Poll `get_status` every `poll_interval` until the job is terminal
    pub async fn wait_for_job(&self, job_id: &str, poll_interval: Duration) -> Result<JobSnapshot> {
        loop {
            let snapshot = self.get_status(job_id)?;
            if snapshot.status.is_terminal() {
                return Ok(snapshot);
            }
            tokio::time::sleep(poll_interval).await;
        }
    }

    fn terminal_results(&self, job_id: &str) -> Result<Vec<ResultEntry>> {
        let (status, progress, entries) = self.registry.results(job_id)?;
        if !status.is_terminal() {
            return Err(EngineError::JobNotFinished {
                job_id: job_id.to_string(),
                status,
                progress,
            });
        }
        Ok(entries)
    }
}
