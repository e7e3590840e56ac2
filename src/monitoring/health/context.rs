//! Inputs shared by every probe

use crate::config::AlertThresholds;
use crate::monitoring::collaborators::{DatabaseHandle, DependentService, ErrorStatsSource};
use crate::monitoring::metrics::ResourceSampler;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Everything a probe may read while evaluating
#[derive(Clone)]
pub struct ProbeContext {
    pub thresholds: AlertThresholds,
    /// When the monitor was created; uptime and error rates are measured from here
    pub started_at: Instant,
    pub sampler: Arc<dyn ResourceSampler>,
    pub database: Option<Arc<dyn DatabaseHandle>>,
    pub services: Vec<Arc<dyn DependentService>>,
    pub error_stats: Arc<dyn ErrorStatsSource>,
}

impl ProbeContext {
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }
}
