//! Logging setup
//!
//! Installs a `tracing-subscriber` formatter. `RUST_LOG` takes precedence
//! over the level passed in.

use crate::utils::error::{MonitorError, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// Fails if a subscriber has already been installed for this process.
pub fn init_tracing(level: Level, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| MonitorError::Config(format!("Failed to initialize logging: {}", e)))
}

/// Parse a level name such as `info` or `DEBUG`
pub fn parse_level(name: &str) -> Result<Level> {
    name.parse::<Level>()
        .map_err(|_| MonitorError::Config(format!("Unknown log level: {}", name)))
}
