//! OS resource sampling
//!
//! Real figures come from the `sysinfo` crate when the `metrics` feature is
//! enabled; otherwise every reading is zero.

use crate::monitoring::types::{CpuUsage, MemoryUsage};
use crate::utils::error::Result;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use crate::utils::error::MonitorError;
#[cfg(feature = "metrics")]
use parking_lot::Mutex;
#[cfg(feature = "metrics")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// Source of memory and CPU readings for probes and snapshots
pub trait ResourceSampler: Send + Sync {
    fn memory(&self) -> Result<MemoryUsage>;

    fn cpu(&self) -> CpuUsage;
}

/// Sampler that reports zeros
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSampler;

impl ResourceSampler for NullSampler {
    fn memory(&self) -> Result<MemoryUsage> {
        Ok(MemoryUsage::default())
    }

    fn cpu(&self) -> CpuUsage {
        CpuUsage::default()
    }
}

/// Sampler backed by `sysinfo`
///
/// Memory usage is system-wide used/total; RSS is this process only.
#[cfg(feature = "metrics")]
pub struct SysinfoSampler {
    system: Mutex<System>,
    pid: Pid,
}

#[cfg(feature = "metrics")]
impl SysinfoSampler {
    pub fn new() -> Result<Self> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| MonitorError::config(format!("Cannot resolve own pid: {}", e)))?;

        Ok(Self {
            system: Mutex::new(System::new()),
            pid,
        })
    }
}

#[cfg(feature = "metrics")]
impl ResourceSampler for SysinfoSampler {
    fn memory(&self) -> Result<MemoryUsage> {
        let mut sys = self.system.lock();
        sys.refresh_memory();
        sys.refresh_processes(ProcessesToUpdate::Some(&[self.pid]), true);

        let rss_bytes = sys
            .process(self.pid)
            .map(|process| process.memory())
            .ok_or_else(|| {
                MonitorError::probe("memory", format!("process {} not found", self.pid))
            })?;

        Ok(MemoryUsage {
            used_bytes: sys.used_memory(),
            total_bytes: sys.total_memory(),
            rss_bytes,
        })
    }

    fn cpu(&self) -> CpuUsage {
        let mut sys = self.system.lock();
        sys.refresh_cpu_usage();
        let load = System::load_average();

        CpuUsage {
            usage_percent: sys.global_cpu_usage() as f64,
            load_average: [load.one, load.five, load.fifteen],
        }
    }
}

/// Best sampler available in this build
pub fn default_sampler() -> Arc<dyn ResourceSampler> {
    #[cfg(feature = "metrics")]
    {
        match SysinfoSampler::new() {
            Ok(sampler) => return Arc::new(sampler),
            Err(e) => tracing::warn!("Falling back to null resource sampler: {}", e),
        }
    }

    Arc::new(NullSampler)
}
