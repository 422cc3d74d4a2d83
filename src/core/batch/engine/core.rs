//! Core BatchEngine struct and submission API

use super::execution::Supervisor;
use super::options::JobOptions;
use crate::config::{EngineConfig, Validate};
use crate::core::batch::chunker::chunk;
use crate::core::batch::collector::{CollectorMessage, ResultCollector, Terminal};
use crate::core::batch::pool::Unit;
use crate::core::batch::processor::{Processor, ProcessorArgs};
use crate::core::batch::registry::JobRegistry;
use crate::core::batch::streaming::StreamProcessor;
use crate::core::batch::table::Table;
use crate::core::batch::types::*;
use crate::utils::error::{EngineError, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{error, info};

/// In-process batch job engine
///
/// Cloning is cheap; clones share the registry and the result collector.
#[derive(Debug, Clone)]
pub struct BatchEngine {
    pub(super) config: Arc<EngineConfig>,
    pub(super) registry: Arc<JobRegistry>,
    pub(super) collector: Arc<ResultCollector>,
    pub(super) runtime: Handle,
}

impl BatchEngine {
    /// Create an engine and start its result collector
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| EngineError::config(format!("Engine config error: {}", e)))?;

        let runtime = Handle::try_current().map_err(|e| {
            EngineError::internal(format!("BatchEngine requires a tokio runtime: {}", e))
        })?;

        let registry = Arc::new(JobRegistry::new());
        let collector = Arc::new(ResultCollector::spawn(Arc::clone(&registry), &runtime));

        info!(
            max_workers = config.worker_count(),
            chunk_size = config.chunk_size,
            concurrency_mode = ?config.concurrency_mode,
            "Batch engine started"
        );

        Ok(Self {
            config: Arc::new(config),
            registry,
            collector,
            runtime,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Submit a table; the processor runs once per row chunk
    ///
    /// Returns as soon as the job is registered. The table is split into
    /// `chunk_size`-row chunks before this returns.
    pub fn submit_dataframe_job<P>(
        &self,
        table: Table,
        processor: P,
        options: JobOptions,
    ) -> Result<JobId>
    where
        P: Processor<Table>,
    {
        let kind = JobKind::Dataframe;
        let settings = self.resolve_settings(kind, &options)?;
        let name = Self::resolve_name(kind, &options)?;
        let rows = table.len();

        let job_id = self
            .registry
            .create(name.clone(), kind, processor.name(), settings.clone());
        info!(job_id = %job_id, name = %name, rows, "Submitting dataframe job");

        let plan = chunk(table, settings.chunk_size).map(|chunks| {
            chunks
                .into_iter()
                .map(|c| {
                    vec![Unit {
                        index: c.index,
                        label: None,
                        data: c.data,
                    }]
                })
                .collect::<Vec<_>>()
        });

        self.launch(job_id, plan, Arc::new(processor), options.args, settings)
    }

    /// Submit file paths; the processor runs once per file
    ///
    /// Files are grouped into `chunk_size` batches. Error records carry the
    /// failing file's path.
    pub fn submit_file_batch_job<P>(
        &self,
        files: Vec<PathBuf>,
        processor: P,
        options: JobOptions,
    ) -> Result<JobId>
    where
        P: Processor<PathBuf>,
    {
        let kind = JobKind::FileBatch;
        let settings = self.resolve_settings(kind, &options)?;
        let name = Self::resolve_name(kind, &options)?;
        let file_count = files.len();

        let job_id = self
            .registry
            .create(name.clone(), kind, processor.name(), settings.clone());
        info!(job_id = %job_id, name = %name, files = file_count, "Submitting file batch job");

        let plan = chunk(files, settings.chunk_size).map(|chunks| {
            chunks
                .into_iter()
                .map(|c| {
                    let offset = c.offset;
                    c.data
                        .into_iter()
                        .enumerate()
                        .map(|(i, path)| Unit {
                            index: offset + i,
                            label: Some(path.display().to_string()),
                            data: path,
                        })
                        .collect::<Vec<_>>()
                })
                .collect::<Vec<_>>()
        });

        self.launch(job_id, plan, Arc::new(processor), options.args, settings)
    }

    /// Process `source` lazily on the calling thread, one chunk per iteration
    pub fn stream_process<S, P>(
        &self,
        source: S,
        processor: P,
        chunk_size: Option<usize>,
        max_items: Option<usize>,
        args: ProcessorArgs,
    ) -> Result<StreamProcessor<S::IntoIter, P>>
    where
        S: IntoIterator,
        P: Processor<Vec<S::Item>>,
    {
        StreamProcessor::new(
            source,
            processor,
            chunk_size.unwrap_or(self.config.chunk_size),
            max_items,
            args,
        )
    }

    /// Fix the unit count and hand the plan to a supervisor task
    fn launch<U>(
        &self,
        job_id: JobId,
        plan: Result<Vec<Vec<Unit<U>>>>,
        processor: Arc<dyn Processor<U>>,
        args: ProcessorArgs,
        settings: JobSettings,
    ) -> Result<JobId>
    where
        U: Send + Sync + 'static,
    {
        let plan = match plan {
            Ok(plan) => plan,
            Err(e) => {
                error!(job_id = %job_id, error = %e, "Failed to partition job input");
                self.registry.apply(CollectorMessage::Finished {
                    job_id: job_id.clone(),
                    terminal: Terminal::Failed {
                        error: e.to_string(),
                        traceback: format!("{:?}", e),
                    },
                });
                return Ok(job_id);
            }
        };

        let total_units: usize = plan.iter().map(Vec::len).sum();
        if !self.registry.start(&job_id, total_units)? {
            // cancelled before it started
            return Ok(job_id);
        }

        if total_units == 0 {
            self.registry.apply(CollectorMessage::Finished {
                job_id: job_id.clone(),
                terminal: Terminal::Completed,
            });
            return Ok(job_id);
        }

        let supervisor = Supervisor::new(
            job_id.clone(),
            Arc::clone(&self.registry),
            Arc::clone(&self.collector),
            processor,
            Arc::new(args),
            settings,
        );
        self.runtime.spawn(supervisor.run(plan));

        Ok(job_id)
    }
}
