//! Bounded worker pool
//!
//! A pool runs at most `max_workers` units at once and yields their outcomes
//! in completion order. The supervisor owns the pool and decides its lifetime
//! (one per job or one per chunk).

use super::outcome::Outcome;
use super::processor::{Processor, ProcessorArgs, UnitFailure, run_unit};
use super::types::ConcurrencyMode;
use crate::utils::error::{EngineError, Result};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tracing::debug;

/// One schedulable piece of work
#[derive(Debug)]
pub(crate) struct Unit<U> {
    /// Position in the job's original ordering
    pub index: usize,
    /// File path for file-batch units
    pub label: Option<String>,
    pub data: U,
}

/// Outcome of one unit, tagged with its position
#[derive(Debug)]
pub(crate) struct UnitOutcome {
    pub index: usize,
    pub label: Option<String>,
    pub result: std::result::Result<Outcome, UnitFailure>,
}

pub(crate) struct WorkerPool<U> {
    mode: ConcurrencyMode,
    max_workers: usize,
    thread_prefix: String,
    processor: Arc<dyn Processor<U>>,
    args: Arc<ProcessorArgs>,
    tasks: JoinSet<Result<UnitOutcome>>,
}

impl<U: Send + Sync + 'static> WorkerPool<U> {
    pub(crate) fn new(
        mode: ConcurrencyMode,
        max_workers: usize,
        thread_prefix: String,
        processor: Arc<dyn Processor<U>>,
        args: Arc<ProcessorArgs>,
    ) -> Self {
        Self {
            mode,
            max_workers: max_workers.max(1),
            thread_prefix,
            processor,
            args,
            tasks: JoinSet::new(),
        }
    }

    /// Whether another unit may start without exceeding the bound
    pub(crate) fn has_capacity(&self) -> bool {
        self.tasks.len() < self.max_workers
    }

    pub(crate) fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Start a unit; fails only if the execution resource cannot be created
    pub(crate) fn submit(&mut self, unit: Unit<U>) -> Result<()> {
        let processor = Arc::clone(&self.processor);
        let args = Arc::clone(&self.args);
        let Unit { index, label, data } = unit;
        debug!(unit = index, mode = ?self.mode, "Submitting unit");

        match self.mode {
            ConcurrencyMode::Threads => {
                self.tasks.spawn_blocking(move || {
                    let result = run_unit(processor.as_ref(), &data, &args);
                    Ok(UnitOutcome {
                        index,
                        label,
                        result,
                    })
                });
            }
            ConcurrencyMode::Isolated => {
                let (tx, rx) = oneshot::channel();
                std::thread::Builder::new()
                    .name(format!("{}-{}", self.thread_prefix, index))
                    .spawn(move || {
                        let result = run_unit(processor.as_ref(), &data, &args);
                        let _ = tx.send(result);
                    })
                    .map_err(|e| {
                        EngineError::internal(format!(
                            "Failed to start isolated worker for unit {}: {}",
                            index, e
                        ))
                    })?;

                self.tasks.spawn(async move {
                    let result = rx.await.map_err(|_| {
                        EngineError::internal(format!(
                            "Isolated worker for unit {} exited without reporting",
                            index
                        ))
                    })?;
                    Ok(UnitOutcome {
                        index,
                        label,
                        result,
                    })
                });
            }
        }

        Ok(())
    }

    /// Wait for the next unit to finish; `None` once the pool is drained
    pub(crate) async fn next_completed(&mut self) -> Option<Result<UnitOutcome>> {
        let joined = self.tasks.join_next().await?;
        Some(joined.map_err(EngineError::from).and_then(|outcome| outcome))
    }
}
