//! Engine configuration

use super::*;
use crate::config::env::parse_env_var;
use crate::core::batch::{ConcurrencyMode, JobKind, PoolScope};
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Defaults applied to every job unless overridden per submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Maximum units running at once per job; derived from the CPU count when unset
    #[serde(default)]
    pub max_workers: Option<usize>,
    /// Items per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Execution mode for new jobs
    #[serde(default)]
    pub concurrency_mode: ConcurrencyMode,
    /// Pool lifetime for new jobs; per-kind default when unset
    #[serde(default)]
    pub pool_scope: Option<PoolScope>,
    /// Default number of summaries returned by `list_jobs`
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_workers: None,
            chunk_size: default_chunk_size(),
            concurrency_mode: ConcurrencyMode::default(),
            pool_scope: None,
            list_limit: default_list_limit(),
        }
    }
}

impl EngineConfig {
    /// Read `BATCH_*` variables over the defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_workers: parse_env_var("BATCH_MAX_WORKERS")?,
            chunk_size: parse_env_var("BATCH_CHUNK_SIZE")?.unwrap_or(defaults.chunk_size),
            concurrency_mode: parse_env_var("BATCH_CONCURRENCY_MODE")?
                .unwrap_or(defaults.concurrency_mode),
            pool_scope: parse_env_var("BATCH_POOL_SCOPE")?,
            list_limit: parse_env_var("BATCH_LIST_LIMIT")?.unwrap_or(defaults.list_limit),
        })
    }

    /// Get the number of workers (defaults to twice the CPU count, at most 32)
    pub fn worker_count(&self) -> usize {
        self.max_workers.unwrap_or_else(default_worker_count)
    }

    /// Pool scope for a job of `kind`: dataframe jobs share one pool, file batches get one per chunk
    pub fn pool_scope_for(&self, kind: JobKind) -> PoolScope {
        self.pool_scope.unwrap_or(match kind {
            JobKind::Dataframe => PoolScope::Job,
            JobKind::FileBatch => PoolScope::Chunk,
        })
    }

    /// Builder-style worker override
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    /// Builder-style chunk size override
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }
}
