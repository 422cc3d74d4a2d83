//! Submission validation and settings resolution

use super::core::BatchEngine;
use super::options::JobOptions;
use crate::core::batch::types::{JobKind, JobSettings};
use crate::utils::error::{EngineError, Result};
use chrono::Utc;

impl BatchEngine {
    /// Effective settings for a submission, rejecting zero sizes
    pub(super) fn resolve_settings(&self, kind: JobKind, options: &JobOptions) -> Result<JobSettings> {
        let chunk_size = options.chunk_size.unwrap_or(self.config.chunk_size);
        if chunk_size == 0 {
            return Err(EngineError::invalid_request(
                "chunk_size must be greater than 0",
            ));
        }

        let max_workers = options
            .max_workers
            .unwrap_or_else(|| self.config.worker_count());
        if max_workers == 0 {
            return Err(EngineError::invalid_request(
                "max_workers must be greater than 0",
            ));
        }

        Ok(JobSettings {
            chunk_size,
            max_workers,
            concurrency_mode: options
                .concurrency_mode
                .unwrap_or(self.config.concurrency_mode),
            pool_scope: options
                .pool_scope
                .unwrap_or_else(|| self.config.pool_scope_for(kind)),
        })
    }

    /// Caller-supplied name, or `<prefix>_<YYYYmmdd_HHMMSS>`
    pub(super) fn resolve_name(kind: JobKind, options: &JobOptions) -> Result<String> {
        match &options.name {
            Some(name) if name.trim().is_empty() => {
                Err(EngineError::invalid_request("Job name cannot be empty"))
            }
            Some(name) => Ok(name.clone()),
            None => Ok(format!(
                "{}_{}",
                kind.name_prefix(),
                Utc::now().format("%Y%m%d_%H%M%S")
            )),
        }
    }
}
