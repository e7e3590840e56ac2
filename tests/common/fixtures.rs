//! Test fixtures and fake collaborators
//!
//! Fakes implement the public collaborator traits, so these tests see the
//! crate exactly as a host application would.

use health_monitor::monitoring::collaborators::{DatabaseHandle, DependentService};
use health_monitor::monitoring::metrics::ResourceSampler;
use health_monitor::monitoring::{CpuUsage, MemoryUsage};
use health_monitor::{MonitorConfig, MonitorError, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

const MB: u64 = 1024 * 1024;

/// Factory for monitor configurations
pub struct ConfigFactory;

impl ConfigFactory {
    /// Defaults with both periods fixed, independent of the environment
    pub fn create() -> MonitorConfig {
        MonitorConfig {
            health_check_interval_ms: 30_000,
            metrics_interval_ms: 10_000,
            ..MonitorConfig::default()
        }
    }

    /// Short periods for tests that run on the real clock
    pub fn fast() -> MonitorConfig {
        MonitorConfig {
            health_check_interval_ms: 50,
            metrics_interval_ms: 20,
            probe_timeout_ms: 2_000,
            ..MonitorConfig::default()
        }
    }
}

/// Sampler reporting a settable memory usage percentage and RSS
#[derive(Debug)]
pub struct StubSampler {
    memory: Mutex<MemoryUsage>,
}

impl StubSampler {
    pub fn new(usage_percent: u64, rss_mb: u64) -> Self {
        Self {
            memory: Mutex::new(Self::usage(usage_percent, rss_mb)),
        }
    }

    pub fn set(&self, usage_percent: u64, rss_mb: u64) {
        *self.memory.lock() = Self::usage(usage_percent, rss_mb);
    }

    fn usage(usage_percent: u64, rss_mb: u64) -> MemoryUsage {
        MemoryUsage {
            used_bytes: usage_percent * 10 * MB,
            total_bytes: 1000 * MB,
            rss_bytes: rss_mb * MB,
        }
    }
}

impl ResourceSampler for StubSampler {
    fn memory(&self) -> Result<MemoryUsage> {
        Ok(*self.memory.lock())
    }

    fn cpu(&self) -> CpuUsage {
        CpuUsage::default()
    }
}

/// Database that can be taken down; reconnecting brings it back
#[derive(Debug, Default)]
pub struct FakeDatabase {
    down: AtomicBool,
    reconnects: AtomicU32,
}

impl FakeDatabase {
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn reconnects(&self) -> u32 {
        self.reconnects.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl DatabaseHandle for FakeDatabase {
    async fn ping(&self) -> Result<()> {
        if self.down.load(Ordering::SeqCst) {
            return Err(MonitorError::database("connection reset"));
        }
        Ok(())
    }

    async fn reconnect(&self) -> Result<()> {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
        self.down.store(false, Ordering::SeqCst);
        Ok(())
    }
}

/// Service whose restarts can be made to fail
#[derive(Debug)]
pub struct FakeService {
    name: String,
    alive: AtomicBool,
    restart_fails: AtomicBool,
    restarts: AtomicU32,
}

impl FakeService {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alive: AtomicBool::new(true),
            restart_fails: AtomicBool::new(false),
            restarts: AtomicU32::new(0),
        }
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    pub fn fail_restarts(&self) {
        self.restart_fails.store(true, Ordering::SeqCst);
    }

    pub fn restarts(&self) -> u32 {
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
        if self.restart_fails.load(Ordering::SeqCst) {
            return Err(MonitorError::service(format!("{} refused to restart", self.name)));
        }
        self.alive.store(true, Ordering::SeqCst);
        Ok(())
    }
}
