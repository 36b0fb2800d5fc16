use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging for the mensa CLI
///
/// Logs are written to:
/// - XDG_DATA_HOME/mensa/logs/ on Unix (typically ~/.local/share/mensa/logs/)
/// - ~/Library/Application Support/mensa/logs/ on macOS
///
/// Log files are rotated daily with the pattern: mensa.log.YYYY-MM-DD
///
/// The log level can be controlled via the RUST_LOG environment variable:
/// - RUST_LOG=debug mensa menu  (verbose logging)
/// - RUST_LOG=info mensa menu   (default level)
/// - RUST_LOG=error mensa menu  (errors only)
pub fn init() -> Result<()> {
    let log_dir = get_log_dir()?;

    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "mensa.log");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mensa=info"));

    // File layer carries full detail; stderr stays compact for interactive use.
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}

/// Get the log directory path using XDG conventions
fn get_log_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .context("Failed to determine data directory (XDG_DATA_HOME or platform equivalent)")?;

    Ok(data_dir.join("mensa").join("logs"))
}
