//! # health-monitor
//!
//! An in-process health supervisor for long-running services.
//!
//! ## Features
//!
//! - **Periodic probes**: system, database, memory, error rate and dependent services
//! - **Tri-state health**: every probe reports `healthy`, `warning` or `critical`
//! - **Latest-wins registry**: one current result per probe, read as a snapshot
//! - **Bounded metrics history**: the most recent 100 system snapshots
//! - **Alerting**: aggregated warning/critical alerts after every cycle
//! - **Auto-recovery**: per-probe recovery with a five minute cooldown
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use health_monitor::{HealthMonitor, MonitorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let monitor = HealthMonitor::new(MonitorConfig::default())?;
//!     let mut alerts = monitor.subscribe_alerts();
//!
//!     monitor.start().await;
//!     println!("Overall health: {}", monitor.get_overall_health());
//!
//!     while let Ok(alert) = alerts.recv().await {
//!         println!("[{}] {}", alert.level, alert.message);
//!     }
//!
//!     monitor.stop();
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Public module exports
pub mod config;
pub mod monitoring;
pub mod utils;

// Re-export main types
pub use config::{AlertThresholds, MonitorConfig, ServiceEndpoint};
pub use monitoring::{
    AlertEvent, AlertLevel, HealthCheck, HealthMonitor, HealthMonitorBuilder, HealthState,
    ProbeName, SystemMetrics,
};
pub use utils::error::{MonitorError, Result};

#[cfg(feature = "metrics")]
pub use monitoring::PrometheusExporter;

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
