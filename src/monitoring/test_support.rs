//! Fake collaborators shared by the unit tests

use super::collaborators::{DatabaseHandle, DependentService, ErrorStatsSource};
use super::health::ProbeContext;
use super::metrics::ResourceSampler;
use super::types::{CpuUsage, MemoryUsage};
use crate::config::AlertThresholds;
use crate::utils::error::{MonitorError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

pub(crate) const MB: u64 = 1024 * 1024;

/// Sampler with settable readings and an optional failure switch
#[derive(Debug)]
pub(crate) struct FixedSampler {
    memory: Mutex<MemoryUsage>,
    failing: AtomicBool,
}

impl FixedSampler {
    pub(crate) fn new(usage_percent: u64, rss_mb: u64) -> Self {
        Self {
            memory: Mutex::new(usage(usage_percent, rss_mb)),
            failing: AtomicBool::new(false),
        }
    }

    pub(crate) fn set(&self, usage_percent: u64, rss_mb: u64) {
        *self.memory.lock() = usage(usage_percent, rss_mb);
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

fn usage(usage_percent: u64, rss_mb: u64) -> MemoryUsage {
    MemoryUsage {
        used_bytes: usage_percent * 10 * MB,
        total_bytes: 1000 * MB,
        rss_bytes: rss_mb * MB,
    }
}

impl ResourceSampler for FixedSampler {
    fn memory(&self) -> Result<MemoryUsage> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MonitorError::probe("memory", "sampler unavailable"));
        }
        Ok(*self.memory.lock())
    }

    fn cpu(&self) -> CpuUsage {
        CpuUsage {
            usage_percent: 12.5,
            load_average: [0.5, 0.4, 0.3],
        }
    }
}

/// Database whose ping can fail or stall on demand
#[derive(Debug, Default)]
pub(crate) struct FakeDatabase {
    pub(crate) failing: AtomicBool,
    pub(crate) delay: Mutex<Option<Duration>>,
    pub(crate) reconnects: AtomicU32,
}

impl FakeDatabase {
    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = Some(delay);
    }

    pub(crate) fn reconnects(&self) -> u32 {
        self.reconnects.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DatabaseHandle for FakeDatabase {
    async fn ping(&self) -> Result<()> {
        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(MonitorError::database("connection refused"));
        }
        Ok(())
    }

    fn connection_count(&self) -> u32 {
        4
    }

    async fn reconnect(&self) -> Result<()> {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(MonitorError::database("still unreachable"));
        }
        Ok(())
    }
}

/// Service with a toggleable liveness answer and a restart counter
#[derive(Debug)]
pub(crate) struct FakeService {
    name: String,
    alive: AtomicBool,
    pub(crate) restarts: AtomicU32,
}

impl FakeService {
    pub(crate) fn new(name: &str, alive: bool) -> Self {
        Self {
            name: name.to_string(),
            alive: AtomicBool::new(alive),
            restarts: AtomicU32::new(0),
        }
    }

    pub(crate) fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    pub(crate) fn restarts(&self) -> u32 {
        self.restarts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DependentService for FakeService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    async fn restart(&self) -> Result<()> {
        self.restarts.fetch_add(1, Ordering::SeqCst);
        self.alive.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Error statistics with fixed contents
#[derive(Debug, Default)]
pub(crate) struct FixedErrorStats(pub(crate) HashMap<String, serde_json::Value>);

impl ErrorStatsSource for FixedErrorStats {
    fn recovery_stats(&self) -> HashMap<String, serde_json::Value> {
        self.0.clone()
    }
}

/// Probe context over the given sampler with no database or services
pub(crate) fn context(sampler: Arc<FixedSampler>) -> ProbeContext {
    ProbeContext {
        thresholds: AlertThresholds::default(),
        started_at: tokio::time::Instant::now(),
        sampler,
        database: None,
        services: Vec::new(),
        error_stats: Arc::new(FixedErrorStats::default()),
    }
}
