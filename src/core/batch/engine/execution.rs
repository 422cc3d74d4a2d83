//! Job supervision
//!
//! One supervisor task per job submits units to a bounded pool, records each
//! completion and finally reports the job's terminal state through the
//! collector queue.

use crate::core::batch::collector::{CollectorMessage, ResultCollector, Terminal};
use crate::core::batch::pool::{Unit, UnitOutcome, WorkerPool};
use crate::core::batch::processor::{Processor, ProcessorArgs};
use crate::core::batch::registry::JobRegistry;
use crate::core::batch::types::*;
use crate::utils::error::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub(super) struct Supervisor<U> {
    job_id: JobId,
    registry: Arc<JobRegistry>,
    collector: Arc<ResultCollector>,
    processor: Arc<dyn Processor<U>>,
    args: Arc<ProcessorArgs>,
    settings: JobSettings,
}

impl<U: Send + Sync + 'static> Supervisor<U> {
    pub(super) fn new(
        job_id: JobId,
        registry: Arc<JobRegistry>,
        collector: Arc<ResultCollector>,
        processor: Arc<dyn Processor<U>>,
        args: Arc<ProcessorArgs>,
        settings: JobSettings,
    ) -> Self {
        Self {
            job_id,
            registry,
            collector,
            processor,
            args,
            settings,
        }
    }

    /// Run every batch of the plan, then report the terminal state
    pub(super) async fn run(self, plan: Vec<Vec<Unit<U>>>) {
        info!(
            job_id = %self.job_id,
            batches = plan.len(),
            scope = ?self.settings.pool_scope,
            mode = ?self.settings.concurrency_mode,
            "Supervisor started"
        );

        let terminal = match self.run_plan(plan).await {
            Ok(()) => Terminal::Completed,
            Err(e) => {
                error!(job_id = %self.job_id, error = %e, "Supervision failed");
                Terminal::Failed {
                    error: e.to_string(),
                    traceback: format!("{:?}", e),
                }
            }
        };

        // a cancelled job stays cancelled; the registry ignores the late transition
        self.collector.dispatch(CollectorMessage::Finished {
            job_id: self.job_id.clone(),
            terminal,
        });
    }

    async fn run_plan(&self, plan: Vec<Vec<Unit<U>>>) -> Result<()> {
        match self.settings.pool_scope {
            PoolScope::Job => {
                let mut pool = self.new_pool();
                self.drive(&mut pool, plan.into_iter().flatten()).await
            }
            PoolScope::Chunk => {
                for (batch_index, batch) in plan.into_iter().enumerate() {
                    if self.registry.should_stop(&self.job_id) {
                        break;
                    }
                    debug!(job_id = %self.job_id, batch = batch_index, units = batch.len(), "Starting batch pool");
                    let mut pool = self.new_pool();
                    self.drive(&mut pool, batch.into_iter()).await?;
                }
                Ok(())
            }
        }
    }

    fn new_pool(&self) -> WorkerPool<U> {
        let short_id: String = self.job_id.chars().take(8).collect();
        WorkerPool::new(
            self.settings.concurrency_mode,
            self.settings.max_workers,
            format!("batch-{}", short_id),
            Arc::clone(&self.processor),
            Arc::clone(&self.args),
        )
    }

    /// Keep the pool full until units run out or the job is cancelled, then drain it
    async fn drive(
        &self,
        pool: &mut WorkerPool<U>,
        mut units: impl Iterator<Item = Unit<U>>,
    ) -> Result<()> {
        let mut submitting = true;

        loop {
            while submitting && pool.has_capacity() {
                if self.registry.should_stop(&self.job_id) {
                    warn!(job_id = %self.job_id, in_flight = pool.in_flight(), "Job stopped, no further units submitted");
                    submitting = false;
                    break;
                }
                match units.next() {
                    Some(unit) => pool.submit(unit)?,
                    None => submitting = false,
                }
            }

            match pool.next_completed().await {
                Some(outcome) => self.record(outcome?),
                None => return Ok(()),
            }
        }
    }

    fn record(&self, outcome: UnitOutcome) {
        self.registry.record_unit_completion(&self.job_id);

        let UnitOutcome {
            index,
            label,
            result,
        } = outcome;

        let message = match result {
            Ok(outcome) => {
                debug!(job_id = %self.job_id, unit = index, "Unit completed");
                CollectorMessage::Outcome {
                    job_id: self.job_id.clone(),
                    entry: ResultEntry {
                        unit_index: index,
                        outcome,
                    },
                }
            }
            Err(failure) => {
                warn!(job_id = %self.job_id, unit = index, file = ?label, error = %failure, "Unit failed");
                CollectorMessage::Error {
                    job_id: self.job_id.clone(),
                    record: ErrorRecord {
                        unit_index: index,
                        file: label,
                        error: failure.message,
                        traceback: failure.traceback,
                        recorded_at: Utc::now(),
                    },
                }
            }
        };

        self.collector.dispatch(message);
    }
}
