//! Bandwatch price band dashboard library
//!
//! A terminal dashboard for tracking stock tickers against user-defined
//! buy/sell price bands, polling the alert-price REST backend.

pub mod backend;
pub mod cli;
pub mod config;
pub mod market;
pub mod session;
pub mod ui;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;

/// Application result type for consistent error handling
pub type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize tracing subscriber for logging.
///
/// Logs go to a rolling file because stdout belongs to the TUI. The returned
/// guard must be held for the lifetime of the process or buffered lines are
/// lost on exit.
pub fn init_logging(level: &str, file_path: &str) -> Result<WorkerGuard> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let path = std::path::Path::new(file_path);
    let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = directory {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bandwatch.log".to_string());

    let appender = tracing_appender::rolling::never(
        directory.unwrap_or_else(|| std::path::Path::new(".")),
        file_name,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("bandwatch={}", level).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    Ok(guard)
}
