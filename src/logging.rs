use std::{
    fs, io,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use anyhow::{Context, Result};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};
use uuid::Uuid;

use crate::config::{LOG_FILE_PREFIX, LogRotation, LoggingConfig};

/// Overrides the default `info` level, e.g. `BETAI_LOG=feed=debug`.
pub const LOG_ENV_VAR: &str = "BETAI_LOG";

/// Dropping the guard flushes whatever the background writer still holds.
pub struct LoggingGuard {
    _flush: WorkerGuard,
    run_id: Uuid,
}

impl LoggingGuard {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }
}

/// Routes all events to rolling JSON files under `config.dir`, then drops
/// files that have outlived the retention window.
pub fn init_tracing(config: &LoggingConfig) -> Result<LoggingGuard> {
    fs::create_dir_all(&config.dir)
        .with_context(|| format!("failed to create log directory {}", config.dir.display()))?;

    let appender = RollingFileAppender::new(rotation(config.rotation), &config.dir, LOG_FILE_PREFIX);
    let (writer, flush) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(
            fmt::layer()
                .json()
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_current_span(true)
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter),
        )
        .try_init()
        .context("a global tracing subscriber is already installed")?;

    let run_id = Uuid::now_v7();
    let removed = match expired_log_files(&config.dir, SystemTime::now(), config.retention()) {
        Ok(expired) => remove_logged(expired),
        Err(err) => {
            tracing::warn!(target: "logging", dir = %config.dir.display(), error = %err, "log_retention_scan_failed");
            0
        }
    };
    tracing::info!(
        target: "logging",
        run_id = %run_id,
        dir = %config.dir.display(),
        rotation = ?config.rotation,
        retention_days = config.retention_days,
        removed_files = removed,
        "logging_initialized"
    );

    Ok(LoggingGuard {
        _flush: flush,
        run_id,
    })
}

fn rotation(rotation: LogRotation) -> Rotation {
    match rotation {
        LogRotation::Daily => Rotation::DAILY,
        LogRotation::Hourly => Rotation::HOURLY,
        LogRotation::Never => Rotation::NEVER,
    }
}

/// Our own log files last modified at or before `now - keep_for`.
fn expired_log_files(dir: &Path, now: SystemTime, keep_for: Duration) -> io::Result<Vec<PathBuf>> {
    let cutoff = now.checked_sub(keep_for).unwrap_or(SystemTime::UNIX_EPOCH);
    let mut expired = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_name().to_string_lossy().starts_with(LOG_FILE_PREFIX) {
            continue;
        }
        let metadata = entry.metadata()?;
        if metadata.is_file() && metadata.modified()? <= cutoff {
            expired.push(entry.path());
        }
    }

    Ok(expired)
}

/// Removes each file, counting successes. Failures are logged and skipped.
fn remove_logged(paths: Vec<PathBuf>) -> usize {
    paths
        .into_iter()
        .filter(|path| match fs::remove_file(path) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(target: "logging", path = %path.display(), error = %err, "expired_log_not_removed");
                false
            }
        })
        .count()
}
