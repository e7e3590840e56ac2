//! Configuration management for the health monitor
//!
//! Configuration is loaded once, from a YAML file or from environment
//! variables, validated, and then handed to the monitor by value.

mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{MonitorError, Result};
use std::path::Path;
use tracing::{debug, info};

impl MonitorConfig {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MonitorError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| MonitorError::Config(format!("Failed to parse config: {}", e)))?;

        config.validated()
    }

    /// Validate, converting the failure into a configuration error
    pub fn validated(self) -> Result<Self> {
        Validate::validate(&self)
            .map_err(|e| MonitorError::Config(format!("Monitor config error: {}", e)))?;
        Ok(self)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| MonitorError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
