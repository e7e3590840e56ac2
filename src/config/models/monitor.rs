//! Health monitor configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Health monitor configuration
///
/// Set once when the monitor is constructed and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Period of the health-check cycle in milliseconds
    #[serde(default = "default_health_check_interval_ms")]
    pub health_check_interval_ms: u64,
    /// Period of the metrics-collection cycle in milliseconds
    #[serde(default = "default_metrics_interval_ms")]
    pub metrics_interval_ms: u64,
    /// Whether critical probes trigger recovery routines
    #[serde(default = "default_true")]
    pub enable_auto_recovery: bool,
    /// Thresholds the probes compare their measurements against
    #[serde(default)]
    pub alert_thresholds: AlertThresholds,
    /// Forward alert events to `notification_endpoint`
    #[serde(default)]
    pub enable_notifications: bool,
    /// Webhook receiving alert events
    #[serde(default)]
    pub notification_endpoint: Option<String>,
    /// Upper bound on a single probe evaluation in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
    /// Upper bound on a single recovery routine in milliseconds
    #[serde(default = "default_recovery_timeout_ms")]
    pub recovery_timeout_ms: u64,
    /// Entries older than this many health-check periods count as stale
    #[serde(default)]
    pub stale_after_cycles: Option<u32>,
    /// Dependent services probed over HTTP
    #[serde(default)]
    pub services: Vec<ServiceEndpoint>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            health_check_interval_ms: default_health_check_interval_ms(),
            metrics_interval_ms: default_metrics_interval_ms(),
            enable_auto_recovery: true,
            alert_thresholds: AlertThresholds::default(),
            enable_notifications: false,
            notification_endpoint: None,
            probe_timeout_ms: default_probe_timeout_ms(),
            recovery_timeout_ms: default_recovery_timeout_ms(),
            stale_after_cycles: None,
            services: Vec::new(),
        }
    }
}

impl MonitorConfig {
    /// Health-check tick period
    pub fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms)
    }

    /// Metrics tick period
    pub fn metrics_interval(&self) -> Duration {
        Duration::from_millis(self.metrics_interval_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn recovery_timeout(&self) -> Duration {
        Duration::from_millis(self.recovery_timeout_ms)
    }

    /// Age after which a registry entry is reported as stale, if enabled
    pub fn stale_after(&self) -> Option<Duration> {
        self.stale_after_cycles
            .map(|cycles| self.health_check_interval() * cycles)
    }

    /// Merge monitor configurations (other takes precedence where it differs from defaults)
    pub fn merge(mut self, other: Self) -> Self {
        if other.health_check_interval_ms != default_health_check_interval_ms() {
            self.health_check_interval_ms = other.health_check_interval_ms;
        }
        if other.metrics_interval_ms != default_metrics_interval_ms() {
            self.metrics_interval_ms = other.metrics_interval_ms;
        }
        if !other.enable_auto_recovery {
            self.enable_auto_recovery = false;
        }
        self.alert_thresholds = self.alert_thresholds.merge(other.alert_thresholds);
        if other.enable_notifications {
            self.enable_notifications = true;
        }
        if other.notification_endpoint.is_some() {
            self.notification_endpoint = other.notification_endpoint;
        }
        if other.probe_timeout_ms != default_probe_timeout_ms() {
            self.probe_timeout_ms = other.probe_timeout_ms;
        }
        if other.recovery_timeout_ms != default_recovery_timeout_ms() {
            self.recovery_timeout_ms = other.recovery_timeout_ms;
        }
        if other.stale_after_cycles.is_some() {
            self.stale_after_cycles = other.stale_after_cycles;
        }
        if !other.services.is_empty() {
            self.services = other.services;
        }
        self
    }
}

/// Alert thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Memory usage percentage
    #[serde(default = "default_memory_usage")]
    pub memory_usage: f64,
    /// CPU usage percentage
    ///
    /// Reported with the system probe details; no probe changes state on it.
    #[serde(default = "default_cpu_usage")]
    pub cpu_usage: f64,
    /// Errors per minute
    #[serde(default = "default_error_rate")]
    pub error_rate: f64,
    /// Database round trips slower than this many milliseconds are a warning
    #[serde(default = "default_response_time")]
    pub response_time: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            memory_usage: default_memory_usage(),
            cpu_usage: default_cpu_usage(),
            error_rate: default_error_rate(),
            response_time: default_response_time(),
        }
    }
}

impl AlertThresholds {
    pub fn merge(mut self, other: Self) -> Self {
        if other.memory_usage != default_memory_usage() {
            self.memory_usage = other.memory_usage;
        }
        if other.cpu_usage != default_cpu_usage() {
            self.cpu_usage = other.cpu_usage;
        }
        if other.error_rate != default_error_rate() {
            self.error_rate = other.error_rate;
        }
        if other.response_time != default_response_time() {
            self.response_time = other.response_time;
        }
        self
    }
}

/// A dependent service checked by the services probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    /// Service name used in health details and metrics
    pub name: String,
    /// Health URL; any 2xx response counts as up
    pub url: String,
}
