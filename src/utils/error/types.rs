//! Error types for the health monitor

use thiserror::Error;

/// Result type alias for the health monitor
pub type Result<T> = std::result::Result<T, MonitorError>;

/// Main error type for the health monitor
///
/// Only configuration loading and collaborator calls surface these to the
/// caller. Failures inside a tick are logged and absorbed.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A probe could not produce a result
    #[error("Probe '{probe}' failed: {message}")]
    Probe { probe: String, message: String },

    /// A recovery routine failed
    #[error("Recovery error: {0}")]
    Recovery(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Database collaborator errors
    #[error("Database error: {0}")]
    Database(String),

    /// Dependent service errors
    #[error("Service error: {0}")]
    Service(String),

    /// Alert delivery errors
    #[error("Notification error: {0}")]
    Notification(String),

    /// Metrics export errors
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// The collaborator does not support the requested action
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
