//! Result collector
//!
//! A single task per engine drains an unbounded FIFO and merges payloads into
//! job records. Terminal transitions travel through the same queue, so a job
//! is only seen as `completed` after every payload sent before it is merged.

use super::registry::JobRegistry;
use super::types::{ErrorRecord, JobId, ResultEntry};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// How a supervisor ended
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Terminal {
    Completed,
    Failed { error: String, traceback: String },
}

#[derive(Debug)]
pub(crate) enum CollectorMessage {
    Outcome { job_id: JobId, entry: ResultEntry },
    Error { job_id: JobId, record: ErrorRecord },
    Finished { job_id: JobId, terminal: Terminal },
}

impl CollectorMessage {
    pub(crate) fn job_id(&self) -> &str {
        match self {
            CollectorMessage::Outcome { job_id, .. }
            | CollectorMessage::Error { job_id, .. }
            | CollectorMessage::Finished { job_id, .. } => job_id,
        }
    }
}

#[derive(Debug)]
pub(crate) struct ResultCollector {
    tx: mpsc::UnboundedSender<CollectorMessage>,
    registry: Arc<JobRegistry>,
}

impl ResultCollector {
    /// Start the collector task on `runtime`
    pub(crate) fn spawn(registry: Arc<JobRegistry>, runtime: &Handle) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<CollectorMessage>();
        let merger = Arc::clone(&registry);

        runtime.spawn(async move {
            while let Some(message) = rx.recv().await {
                merger.apply(message);
            }
            debug!("Result collector stopped");
        });

        Self { tx, registry }
    }

    /// Queue a message; merged inline if the collector task is gone
    pub(crate) fn dispatch(&self, message: CollectorMessage) {
        if let Err(mpsc::error::SendError(message)) = self.tx.send(message) {
            warn!(job_id = %message.job_id(), "Result collector unavailable, merging inline");
            self.registry.apply(message);
        }
    }
}
