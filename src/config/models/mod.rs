//! Configuration data models

pub mod monitor;

pub use monitor::*;

/// Health-check period, overridable through `HEALTH_CHECK_INTERVAL`
pub fn default_health_check_interval_ms() -> u64 {
    std::env::var("HEALTH_CHECK_INTERVAL")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|v| *v > 0)
        .unwrap_or(30_000)
}

pub fn default_metrics_interval_ms() -> u64 {
    10_000
}

pub fn default_probe_timeout_ms() -> u64 {
    10_000
}

pub fn default_recovery_timeout_ms() -> u64 {
    30_000
}

pub fn default_memory_usage() -> f64 {
    80.0
}

pub fn default_cpu_usage() -> f64 {
    80.0
}

pub fn default_error_rate() -> f64 {
    5.0
}

pub fn default_response_time() -> f64 {
    1000.0
}

pub fn default_true() -> bool {
    true
}
