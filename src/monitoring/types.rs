//! Type definitions for health checks, alerts and metrics snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Tri-state probe status, ordered by severity
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    #[default]
    Healthy,
    Warning,
    Critical,
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HealthState::Healthy => write!(f, "healthy"),
            HealthState::Warning => write!(f, "warning"),
            HealthState::Critical => write!(f, "critical"),
        }
    }
}

/// Identifier of a built-in probe
///
/// Declaration order is the order probes run in within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeName {
    System,
    Database,
    Memory,
    Errors,
    Services,
}

impl ProbeName {
    pub const ALL: [ProbeName; 5] = [
        ProbeName::System,
        ProbeName::Database,
        ProbeName::Memory,
        ProbeName::Errors,
        ProbeName::Services,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeName::System => "system",
            ProbeName::Database => "database",
            ProbeName::Memory => "memory",
            ProbeName::Errors => "errors",
            ProbeName::Services => "services",
        }
    }
}

impl std::fmt::Display for ProbeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest result of one probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    /// Probe that produced this result
    pub name: ProbeName,
    /// Evaluated status
    pub status: HealthState,
    /// Human-readable summary built from the raw measurements
    pub message: String,
    /// When the probe was evaluated
    pub timestamp: DateTime<Utc>,
    /// Probe execution time in milliseconds
    pub duration_ms: Option<u64>,
    /// Probe-specific payload; the shape differs per probe
    pub details: serde_json::Value,
}

impl HealthCheck {
    pub fn new(
        name: ProbeName,
        status: HealthState,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            name,
            status,
            message: message.into(),
            timestamp: Utc::now(),
            duration_ms: None,
            details,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }
}

/// Alert levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Critical,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::Warning => write!(f, "WARNING"),
            AlertLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Aggregated alert raised after a health-check cycle
#[derive(Debug, Clone, Serialize)]
pub struct AlertEvent {
    /// Alert ID
    pub id: String,
    pub level: AlertLevel,
    pub message: String,
    /// Every registry entry at this level when the alert was raised
    pub checks: Vec<HealthCheck>,
    pub timestamp: DateTime<Utc>,
}

/// Memory figures reported by a resource sampler
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemoryUsage {
    /// Memory in use, in bytes
    pub used_bytes: u64,
    /// Memory available in total, in bytes
    pub total_bytes: u64,
    /// Resident set size of this process, in bytes
    pub rss_bytes: u64,
}

impl MemoryUsage {
    pub fn usage_percent(&self) -> f64 {
        if self.total_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.total_bytes as f64 * 100.0
    }

    pub fn rss_mb(&self) -> f64 {
        self.rss_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// CPU figures reported by a resource sampler
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CpuUsage {
    pub usage_percent: f64,
    /// 1, 5 and 15 minute load averages
    pub load_average: [f64; 3],
}

/// System metrics snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemMetrics {
    /// Timestamp of the snapshot
    pub timestamp: DateTime<Utc>,
    /// Seconds since the monitor was created, not since the process started
    pub uptime_secs: u64,
    pub memory: MemoryMetrics,
    pub cpu: CpuUsage,
    pub database: DatabaseMetrics,
    /// Up/down per dependent service
    pub services: BTreeMap<String, bool>,
    pub errors: ErrorMetrics,
    pub performance: PerformanceMetrics,
}

/// Memory section of a snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MemoryMetrics {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub rss_bytes: u64,
    pub usage_percent: f64,
}

impl From<MemoryUsage> for MemoryMetrics {
    fn from(usage: MemoryUsage) -> Self {
        Self {
            used_bytes: usage.used_bytes,
            total_bytes: usage.total_bytes,
            rss_bytes: usage.rss_bytes,
            usage_percent: usage.usage_percent(),
        }
    }
}

/// Database section of a snapshot, taken from the latest database check
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DatabaseMetrics {
    pub connected: bool,
    pub response_time_ms: u64,
    pub connections: u32,
}

/// Error-related metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ErrorMetrics {
    /// Sum of every numeric error counter
    pub total: u64,
    pub last_24h: u64,
    /// Value of the `critical` counter, if the source reports one
    pub critical: u64,
}

/// Request performance over the last minute
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    pub avg_response_time_ms: f64,
    pub requests_per_minute: u64,
    /// Percentage of failed requests
    pub error_rate: f64,
}
