//! Metrics collection
//!
//! Periodic `SystemMetrics` snapshots kept in a bounded, oldest-first buffer.

mod bounded;
mod collector;
mod performance;
mod system;


pub use bounded::MAX_METRIC_SNAPSHOTS;
pub use collector::MetricsCollector;
pub use performance::PerformanceTracker;
pub use system::{NullSampler, ResourceSampler, default_sampler};

#[cfg(feature = "metrics")]
pub use system::SysinfoSampler;
