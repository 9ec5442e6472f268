//! Tracing subscriber setup (grounded on the teacher's `common/logging`
//! use of `logroller` for size-based rotation). The CLI's `--loglevel` and
//! `--logpath` flags (spec.md §8) drive this directly: a bare level filters
//! stdout, an optional path additionally tees JSON-formatted lines into a
//! rotating file so the hook RPC surface's volume doesn't fill the disk.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Held by the caller for the process lifetime; dropping it stops flushing
/// the non-blocking file writer.
pub struct LoggingGuard(#[allow(dead_code)] Option<WorkerGuard>);

/// `level` is any string `tracing_subscriber::EnvFilter` accepts (`"info"`,
/// `"debug"`, `"attacker=trace,warp=info"`, ...). `log_dir`, if set, adds a
/// size-rotated JSON file sink at `<log_dir>/attacker.log`.
pub fn init(level: &str, log_dir: Option<&Path>) -> anyhow::Result<LoggingGuard> {
    let console_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(console_filter);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let roller = logroller::LogRollerBuilder::new(dir.to_path_buf(), "attacker.log".into())
                .rotation(logroller::Rotation::SizeBased(logroller::RotationSize::MB(64)))
                .max_keep_files(10)
                .build()
                .map_err(|e| anyhow::anyhow!("failed to initialize log file roller: {e}"))?;
            let (writer, guard) = tracing_appender::non_blocking(roller);
            let file_filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(file_filter);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry().with(console_layer).with(file_layer);
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("global tracing subscriber already set");
    }

    Ok(LoggingGuard(guard))
}

/// Installs a bare stdout subscriber for test binaries; safe to call more
/// than once (later calls are no-ops).
pub fn init_test_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("warn"))
        .with_test_writer()
        .try_init();
}
