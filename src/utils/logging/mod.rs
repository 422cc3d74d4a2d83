//! Logging setup
//!
//! The engine emits `tracing` events; this module installs the subscriber
//! that prints them to the console and appends them to
//! `<log_dir>/batch_processor.log`.

pub mod file_logging;
pub mod init;

pub use file_logging::FileLogging;
pub use init::init_logging;
