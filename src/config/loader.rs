//! Environment variable overrides for the monitor configuration

use super::models::*;
use crate::utils::error::{MonitorError, Result};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

impl MonitorConfig {
    /// Build a configuration from defaults overridden by environment variables
    pub fn from_env() -> Result<Self> {
        debug!("Loading monitor configuration from environment variables");

        let mut config = Self::default();

        if let Some(interval) = parse_var("HEALTH_CHECK_INTERVAL")? {
            config.health_check_interval_ms = interval;
        }
        if let Some(interval) = parse_var("METRICS_INTERVAL")? {
            config.metrics_interval_ms = interval;
        }
        if let Some(enabled) = parse_var("ENABLE_AUTO_RECOVERY")? {
            config.enable_auto_recovery = enabled;
        }
        if let Some(value) = parse_var("ALERT_MEMORY_USAGE")? {
            config.alert_thresholds.memory_usage = value;
        }
        if let Some(value) = parse_var("ALERT_CPU_USAGE")? {
            config.alert_thresholds.cpu_usage = value;
        }
        if let Some(value) = parse_var("ALERT_ERROR_RATE")? {
            config.alert_thresholds.error_rate = value;
        }
        if let Some(value) = parse_var("ALERT_RESPONSE_TIME")? {
            config.alert_thresholds.response_time = value;
        }
        if let Some(enabled) = parse_var("ENABLE_NOTIFICATIONS")? {
            config.enable_notifications = enabled;
        }
        if let Ok(endpoint) = env::var("NOTIFICATION_ENDPOINT") {
            if !endpoint.is_empty() {
                config.notification_endpoint = Some(endpoint);
            }
        }

        debug!("Monitor configuration loaded from environment variables");
        Ok(config)
    }
}

fn parse_var<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| MonitorError::Config(format!("Invalid {}: {}", key, e))),
        _ => Ok(None),
    }
}
