//! Tracing setup: stdout plus one timestamped file per launch.
//!
//! Log files live in the app's `logs` directory and are pruned to a fixed
//! count on every start. `RUST_LOG` overrides the default `info` filter.

use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::OnceLock,
    time::SystemTime,
};

use time::{OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem, macros::format_description};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::app_dirs::{self, AppPaths};

/// Maximum number of log files to retain.
const MAX_LOG_FILES: usize = 10;
const LOG_FILE_PREFIX: &str = "unicorn_board";
const DEFAULT_FILTER: &str = "info,ureq=warn";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// The log directory could not be resolved or created.
    #[error("Log directory unavailable: {0}")]
    Directory(#[from] app_dirs::AppDirError),
    /// Reading, creating or pruning a log file failed.
    #[error("Log file error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to format a timestamp for the log filename.
    #[error("Failed to format log filename time: {0}")]
    FormatTime(#[from] time::error::Format),
    /// A global subscriber is already installed.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing to write to stdout and the per-launch log file.
///
/// Subsequent calls are no-ops. Failures are returned so callers can fall back
/// to [`init_stdout_only`].
pub fn init() -> Result<PathBuf, LoggingError> {
    let log_dir = AppPaths::resolve()?.create_logs_dir()?;
    init_in(&log_dir)
}

/// Like [`init`], but writes log files into `log_dir`.
pub fn init_in(log_dir: &Path) -> Result<PathBuf, LoggingError> {
    let file_name = log_file_name(now_local_or_utc())?;
    let log_path = log_dir.join(&file_name);
    if LOG_GUARD.get().is_some() {
        return Ok(log_path);
    }
    touch(&log_path)?;
    prune_old_logs(log_dir, MAX_LOG_FILES)?;

    let (file_writer, guard) = tracing_appender::non_blocking(rolling::never(log_dir, file_name));
    let timer = build_timer();
    let subscriber = Registry::default()
        .with(env_filter())
        .with(fmt::layer().with_timer(timer.clone()).with_writer(std::io::stdout))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_timer(timer)
                .with_writer(file_writer),
        );
    tracing::subscriber::set_global_default(subscriber)?;
    let _ = LOG_GUARD.set(guard);

    tracing::info!("Logging initialized; log file at {}", log_path.display());
    Ok(log_path)
}

/// Install a stdout-only subscriber; used when the log directory is unusable.
pub fn init_stdout_only() -> Result<(), LoggingError> {
    let subscriber = Registry::default()
        .with(env_filter())
        .with(fmt::layer().with_timer(build_timer()));
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn touch(path: &Path) -> Result<(), LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(drop)
        .map_err(|source| LoggingError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Delete the oldest `.log` files until at most `keep` remain.
fn prune_old_logs(dir: &Path, keep: usize) -> Result<usize, LoggingError> {
    let entries = fs::read_dir(dir).map_err(|source| LoggingError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut logs: Vec<(SystemTime, PathBuf)> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "log"))
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .collect();
    if logs.len() <= keep {
        return Ok(0);
    }
    logs.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    let excess = logs.len() - keep;
    for (_, path) in logs.into_iter().take(excess) {
        fs::remove_file(&path).map_err(|source| LoggingError::Io { path, source })?;
    }
    Ok(excess)
}

fn log_file_name(now: OffsetDateTime) -> Result<String, LoggingError> {
    const NAME_FORMAT: &[BorrowedFormatItem<'_>] =
        format_description!("[year]-[month]-[day]_[hour]-[minute]-[second]");
    Ok(format!("{LOG_FILE_PREFIX}_{}.log", now.format(NAME_FORMAT)?))
}

fn build_timer() -> fmt::time::OffsetTime<BorrowedFormatItem<'static>> {
    const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    fmt::time::OffsetTime::new(offset, DISPLAY_FORMAT.into())
}

fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
