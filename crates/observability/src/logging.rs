//! Logging initialization
//!
//! Sets up the tracing subscriber once at process start. The filter comes
//! from `RUST_LOG` when set, otherwise from the configured level, otherwise
//! `info`.

use config::{LogConfig, LogFormat};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging system from configuration.
///
/// Call exactly once, before any component logs. Components never touch
/// global logging state beyond emitting events.
pub fn init_logging(service_name: &str, log: &LogConfig) -> anyhow::Result<()> {
    let default_level = log.level.as_deref().unwrap_or("info");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log.format {
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_ansi(true),
                )
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().compact())
                .init();
        }
    }

    tracing::info!(
        service = service_name,
        format = ?log.format,
        "logging initialized"
    );
    Ok(())
}
