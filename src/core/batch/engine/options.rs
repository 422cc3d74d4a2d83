//! Per-job submission options

use crate::core::batch::processor::ProcessorArgs;
use crate::core::batch::types::{ConcurrencyMode, PoolScope};
use serde_json::Value;

/// Overrides for one submission; unset fields fall back to the engine config
#[derive(Debug, Clone, Default)]
pub struct JobOptions {
    /// Job name; generated from the submission time when unset
    pub name: Option<String>,
    /// Items (rows or files) per chunk
    pub chunk_size: Option<usize>,
    pub concurrency_mode: Option<ConcurrencyMode>,
    pub pool_scope: Option<PoolScope>,
    /// Maximum units executing at once
    pub max_workers: Option<usize>,
    /// Keyword configuration passed to every processor call
    pub args: ProcessorArgs,
}

impl JobOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    pub fn with_concurrency_mode(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = Some(mode);
        self
    }

    pub fn with_pool_scope(mut self, scope: PoolScope) -> Self {
        self.pool_scope = Some(scope);
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = Some(max_workers);
        self
    }

    pub fn with_args(mut self, args: ProcessorArgs) -> Self {
        self.args = args;
        self
    }

    /// Add a single processor argument
    pub fn with_arg<V: Into<Value>>(mut self, key: impl Into<String>, value: V) -> Self {
        self.args.insert(key, value);
        self
    }
}
