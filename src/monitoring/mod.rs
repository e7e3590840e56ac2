//! Health monitoring
//!
//! Periodic probes feed a latest-wins registry, a bounded metrics buffer
//! records system snapshots, and critical results drive cooldown-gated
//! recovery. Everything observable is exposed through query methods and
//! event subscriptions on `HealthMonitor`.

// Public submodules
pub mod alerts;
pub mod collaborators;
pub mod events;
pub mod health;
pub mod metrics;

// Internal submodules
mod background;
mod system;
#[cfg(test)]
mod test_support;
mod types;

#[cfg(feature = "metrics")]
mod exporter;

// Re-export public types
pub use system::{DEFAULT_METRICS_LIMIT, HealthMonitor, HealthMonitorBuilder};
pub use types::{
    AlertEvent, AlertLevel, CpuUsage, DatabaseMetrics, ErrorMetrics, HealthCheck, HealthState,
    MemoryMetrics, MemoryUsage, PerformanceMetrics, ProbeName, SystemMetrics,
};

#[cfg(feature = "metrics")]
pub use exporter::PrometheusExporter;
