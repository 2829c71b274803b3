// src/utils/logging.rs

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::AppError;

/// Installs the global tracing subscriber.
///
/// Logs go to stdout and, when `config.log_dir` is set, to a daily rolling
/// file. Keep the returned guard alive for as long as file logging is needed.
pub fn init_tracing(config: &Config) -> Result<Option<WorkerGuard>, AppError> {
    let env_filter = EnvFilter::try_new(&config.rust_log)
        .map_err(|e| AppError::Config(format!("invalid RUST_LOG '{}': {}", config.rust_log, e)))?;
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "qtype_formulas.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer().with_writer(non_blocking).with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Config(format!("tracing already initialized: {}", e)))?;

    Ok(guard)
}
