use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::Local;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const TIMESTAMP_FORMAT: &str = "[%Y-%m-%d %H:%M:%S]";

/// Local wall-clock timestamp with second resolution, e.g. `[2025-03-07 04:05:06]`.
#[derive(Clone, Copy, Default)]
pub struct LocalSeconds;

impl FormatTime for LocalSeconds {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", Local::now().format(TIMESTAMP_FORMAT))
    }
}

/// Every event goes to stdout and is appended to `log_file`.
///
/// The file is written through a non-blocking worker: a slow or failing disk
/// drops lines instead of stalling the loop. Keep the returned guard alive
/// for the whole process so buffered lines are flushed on exit.
pub fn init_tracing(log_file: &Path) -> anyhow::Result<WorkerGuard> {
    let dir = log_file.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = log_file
        .file_name()
        .with_context(|| format!("Log file path has no file name: {}", log_file.display()))?;
    fs::create_dir_all(dir).context(format!("Failed to create {dir:?} directory"))?;

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_timer(LocalSeconds).with_target(false))
        .with(
            tracing_subscriber::fmt::layer()
                .with_timer(LocalSeconds)
                .with_target(false)
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init()?;
    Ok(guard)
}
