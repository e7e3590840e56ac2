//! Health-check cycle

use super::context::ProbeContext;
use super::probes::HealthProbe;
use super::registry::HealthRegistry;
use crate::monitoring::events::EventBus;
use crate::monitoring::types::{HealthCheck, ProbeName};
use crate::utils::error::{MonitorError, Result, panic_message};
use futures::FutureExt;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap};
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Runs the probe list and owns the registry it writes to
pub struct HealthChecker {
    pub(super) probes: Vec<Box<dyn HealthProbe>>,
    pub(super) context: ProbeContext,
    pub(super) registry: RwLock<HealthRegistry>,
    /// Consecutive failures per probe; cleared on the next success
    pub(super) failures: Mutex<HashMap<ProbeName, u32>>,
    probe_timeout: Duration,
}

impl HealthChecker {
    pub fn new(
        probes: Vec<Box<dyn HealthProbe>>,
        context: ProbeContext,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            probes,
            context,
            registry: RwLock::new(HealthRegistry::new()),
            failures: Mutex::new(HashMap::new()),
            probe_timeout,
        }
    }

    /// Run every probe once, in order, and return the registry afterwards
    ///
    /// A probe that errors, panics or times out is logged and leaves its
    /// previous registry entry untouched; the remaining probes still run.
    pub async fn check_all(&self, events: &EventBus) -> BTreeMap<ProbeName, HealthCheck> {
        debug!("Running health checks");

        for probe in &self.probes {
            let name = probe.name();
            let start = Instant::now();

            match self.evaluate(probe.as_ref()).await {
                Ok(mut check) => {
                    check.name = name;
                    let check = check.with_duration(start.elapsed());
                    debug!(probe = %name, status = %check.status, "{}", check.message);

                    self.registry.write().upsert(check.clone());
                    self.failures.lock().remove(&name);
                    events.emit_health_check(check);
                }
                Err(e) => {
                    let consecutive = {
                        let mut failures = self.failures.lock();
                        let count = failures.entry(name).or_insert(0);
                        *count += 1;
                        *count
                    };
                    warn!(probe = %name, consecutive, "Health check failed: {}", e);
                }
            }
        }

        self.snapshot()
    }

    async fn evaluate(&self, probe: &dyn HealthProbe) -> Result<HealthCheck> {
        let name = probe.name();
        let guarded = AssertUnwindSafe(probe.evaluate(&self.context)).catch_unwind();

        match tokio::time::timeout(self.probe_timeout, guarded).await {
            Ok(Ok(result)) => result,
            Ok(Err(panic)) => Err(MonitorError::probe(
                name.as_str(),
                format!("panicked: {}", panic_message(panic.as_ref())),
            )),
            Err(_) => Err(MonitorError::timeout(format!(
                "probe '{}' exceeded {:?}",
                name, self.probe_timeout
            ))),
        }
    }

    pub fn snapshot(&self) -> BTreeMap<ProbeName, HealthCheck> {
        self.registry.read().snapshot()
    }

    pub fn registry(&self) -> &RwLock<HealthRegistry> {
        &self.registry
    }

    pub fn context(&self) -> &ProbeContext {
        &self.context
    }

    pub fn failures(&self) -> HashMap<ProbeName, u32> {
        self.failures.lock().clone()
    }
}
