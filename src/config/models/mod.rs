//! Configuration data models

pub mod engine;
pub mod logging;

pub use engine::*;
pub use logging::*;

/// Default items per chunk
pub fn default_chunk_size() -> usize {
    100
}

/// Default `list_jobs` limit
pub fn default_list_limit() -> usize {
    100
}

/// Upper bound of the derived worker count
pub const MAX_DEFAULT_WORKERS: usize = 32;

/// Twice the logical CPU count, capped at [`MAX_DEFAULT_WORKERS`]
pub fn default_worker_count() -> usize {
    (num_cpus::get() * 2).clamp(1, MAX_DEFAULT_WORKERS)
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_log_dir() -> std::path::PathBuf {
    std::path::PathBuf::from("./logs")
}

pub fn default_true() -> bool {
    true
}
