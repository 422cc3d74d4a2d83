use super::file_logging::FileLogging;
use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::Result;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber described by `config`
///
/// `RUST_LOG` takes precedence over `config.level`. Fails with
/// [`EngineError::Logging`](crate::utils::error::EngineError::Logging) when a
/// subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let text_console = (config.format == LogFormat::Text).then(|| {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
    });
    let json_console = (config.format == LogFormat::Json).then(|| fmt::layer().json());

    let file_layer = if config.file_enabled {
        let file = FileLogging::setup_file_logging(&config.log_file())?;
        Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(file)),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_console)
        .with(json_console)
        .with(file_layer)
        .try_init()?;

    Ok(())
}
