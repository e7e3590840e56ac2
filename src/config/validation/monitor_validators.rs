//! Health monitor configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

impl Validate for MonitorConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating monitor configuration");

        if self.health_check_interval_ms == 0 {
            return Err("Health check interval must be greater than 0".to_string());
        }
        if self.metrics_interval_ms == 0 {
            return Err("Metrics interval must be greater than 0".to_string());
        }
        if self.probe_timeout_ms == 0 {
            return Err("Probe timeout must be greater than 0".to_string());
        }
        if self.recovery_timeout_ms == 0 {
            return Err("Recovery timeout must be greater than 0".to_string());
        }
        if self.stale_after_cycles == Some(0) {
            return Err("stale_after_cycles must be at least 1 when set".to_string());
        }

        self.alert_thresholds.validate()?;

        if self.enable_notifications {
            let endpoint = self.notification_endpoint.as_deref().ok_or_else(|| {
                "Notification endpoint must be specified when notifications are enabled"
                    .to_string()
            })?;
            validate_http_url(endpoint, "Notification endpoint")?;
        }

        let mut names = HashSet::new();
        for service in &self.services {
            service.validate()?;
            if !names.insert(service.name.as_str()) {
                return Err(format!("Duplicate service name '{}'", service.name));
            }
        }

        Ok(())
    }
}

impl Validate for AlertThresholds {
    fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("memory_usage", self.memory_usage),
            ("cpu_usage", self.cpu_usage),
        ] {
            if !(value > 0.0 && value <= 100.0) {
                return Err(format!(
                    "Alert threshold {} must be a percentage in (0, 100], got {}",
                    name, value
                ));
            }
        }

        if !(self.error_rate > 0.0) {
            return Err("Alert threshold error_rate must be greater than 0".to_string());
        }
        if !(self.response_time > 0.0) {
            return Err("Alert threshold response_time must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for ServiceEndpoint {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Service name cannot be empty".to_string());
        }
        validate_http_url(&self.url, &format!("Service '{}' url", self.name))
    }
}

fn validate_http_url(url_str: &str, context: &str) -> Result<(), String> {
    let url =
        Url::parse(url_str).map_err(|e| format!("{} has invalid URL format: {}", context, e))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "{} must use http:// or https:// scheme, got: {}",
            context, scheme
        )),
    }
}
