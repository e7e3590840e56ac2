//! Snapshot collector and bounded snapshot buffer

use super::bounded::{BoundedPush, MAX_METRIC_SNAPSHOTS};
use super::performance::PerformanceTracker;
use super::system::ResourceSampler;
use crate::monitoring::collaborators::{ErrorStatsSource, sum_counters};
use crate::monitoring::types::{
    DatabaseMetrics, ErrorMetrics, HealthCheck, MemoryMetrics, ProbeName, SystemMetrics,
};
use parking_lot::RwLock;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Builds one `SystemMetrics` per metrics tick and keeps the most recent ones
pub struct MetricsCollector {
    /// Oldest first, at most `MAX_METRIC_SNAPSHOTS` entries
    pub(super) buffer: RwLock<VecDeque<SystemMetrics>>,
    pub(super) performance: PerformanceTracker,
    sampler: Arc<dyn ResourceSampler>,
    error_stats: Arc<dyn ErrorStatsSource>,
}

impl MetricsCollector {
    pub fn new(sampler: Arc<dyn ResourceSampler>, error_stats: Arc<dyn ErrorStatsSource>) -> Self {
        Self {
            buffer: RwLock::new(VecDeque::with_capacity(MAX_METRIC_SNAPSHOTS)),
            performance: PerformanceTracker::new(),
            sampler,
            error_stats,
        }
    }

    /// Take a snapshot, append it to the buffer and return it
    ///
    /// Database and service figures come from the latest health checks so
    /// the metrics tick performs no I/O of its own.
    pub fn collect(
        &self,
        uptime: Duration,
        checks: &BTreeMap<ProbeName, HealthCheck>,
    ) -> SystemMetrics {
        let memory = match self.sampler.memory() {
            Ok(usage) => MemoryMetrics::from(usage),
            Err(e) => {
                warn!("Memory sampling failed, reporting zeros: {}", e);
                MemoryMetrics::default()
            }
        };

        let snapshot = SystemMetrics {
            timestamp: chrono::Utc::now(),
            uptime_secs: uptime.as_secs(),
            memory,
            cpu: self.sampler.cpu(),
            database: database_metrics(checks.get(&ProbeName::Database)),
            services: service_metrics(checks.get(&ProbeName::Services)),
            errors: self.error_metrics(),
            performance: self.performance.summary(),
        };

        self.buffer
            .write()
            .push_bounded(snapshot.clone(), MAX_METRIC_SNAPSHOTS);

        debug!(
            rss_bytes = snapshot.memory.rss_bytes,
            errors = snapshot.errors.total,
            "Collected metrics snapshot"
        );
        snapshot
    }

    /// The `limit` most recent snapshots, oldest to newest
    pub fn recent(&self, limit: usize) -> Vec<SystemMetrics> {
        let buffer = self.buffer.read();
        let skip = buffer.len().saturating_sub(limit);
        buffer.iter().skip(skip).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.read().is_empty()
    }

    pub fn record_request(&self, duration: Duration, success: bool) {
        self.performance.record(duration, success);
    }

    fn error_metrics(&self) -> ErrorMetrics {
        let stats = self.error_stats.recovery_stats();
        let total = sum_counters(&stats).max(0.0) as u64;
        let counter = |key: &str| {
            stats
                .get(key)
                .and_then(serde_json::Value::as_f64)
                .map(|v| v.max(0.0) as u64)
        };

        ErrorMetrics {
            total,
            last_24h: counter("last_24h").unwrap_or(total),
            critical: counter("critical").unwrap_or(0),
        }
    }
}

fn database_metrics(check: Option<&HealthCheck>) -> DatabaseMetrics {
    let Some(check) = check else {
        return DatabaseMetrics::default();
    };

    DatabaseMetrics {
        connected: check.details["connected"].as_bool().unwrap_or(false),
        response_time_ms: check.details["response_time_ms"].as_u64().unwrap_or(0),
        connections: check.details["connections"].as_u64().unwrap_or(0) as u32,
    }
}

fn service_metrics(check: Option<&HealthCheck>) -> BTreeMap<String, bool> {
    check
        .and_then(|c| c.details["services"].as_object())
        .map(|services| {
            services
                .iter()
                .map(|(name, up)| (name.clone(), up.as_bool().unwrap_or(false)))
                .collect()
        })
        .unwrap_or_default()
}
