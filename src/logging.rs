use crate::{Error, Result};
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Validates that a log level string is valid
pub fn validate_log_level(level: &str) -> Result<()> {
    level.parse::<LevelFilter>().map_err(|_| {
        Error::config(format!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            level
        ))
    })?;
    Ok(())
}

/// Picks the effective level: `RUST_LOG` overrides the configured one.
pub fn resolve_log_level(configured: &str) -> String {
    std::env::var("RUST_LOG").unwrap_or_else(|_| configured.to_string())
}

/// Installs the global JSON subscriber.
pub fn init(level: &str) -> Result<()> {
    validate_log_level(level)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| Error::config(format!("Invalid log filter: {}", e)))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init()
        .map_err(|e| Error::internal(format!("Failed to install logger: {}", e)))?;

    Ok(())
}
