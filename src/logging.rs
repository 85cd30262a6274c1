//! Logging setup: structured log lines to console and a log file.

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing with a console layer and a non-blocking file layer.
///
/// The returned guard must be held for the lifetime of the process so
/// buffered log lines are flushed on exit.
pub fn init(log_file: &Path, verbose: bool) -> anyhow::Result<WorkerGuard> {
    let directory = log_file
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let filename = log_file
        .file_name()
        .with_context(|| format!("invalid log file path: {}", log_file.display()))?;

    let appender = tracing_appender::rolling::never(directory, filename);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let default_directive = if verbose {
        "vingest=debug"
    } else {
        "vingest=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive.into());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    Ok(guard)
}
