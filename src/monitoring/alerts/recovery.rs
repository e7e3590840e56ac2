//! Cooldown-gated recovery

use crate::monitoring::collaborators::{DatabaseHandle, DependentService};
use crate::monitoring::types::ProbeName;
use crate::utils::error::{MonitorError, Result, panic_message};
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Minimum time between two recovery attempts for the same probe
pub const RECOVERY_COOLDOWN: Duration = Duration::from_secs(5 * 60);

/// Hook run when memory is critical; Rust has no collector to trigger
pub type MemoryReclaimer = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// What a recovery routine did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryOutcome {
    Performed,
    Skipped(String),
}

/// Probe-specific recovery routines
#[derive(Clone, Default)]
pub struct RecoveryActions {
    pub database: Option<Arc<dyn DatabaseHandle>>,
    pub services: Vec<Arc<dyn DependentService>>,
    pub reclaimer: Option<MemoryReclaimer>,
}

impl RecoveryActions {
    pub async fn run(&self, probe: ProbeName) -> Result<RecoveryOutcome> {
        match probe {
            ProbeName::Database => self.reconnect_database().await,
            ProbeName::Memory => self.reclaim_memory(),
            ProbeName::Services => self.restart_services().await,
            ProbeName::System | ProbeName::Errors => Ok(RecoveryOutcome::Skipped(format!(
                "no recovery routine for '{}'",
                probe
            ))),
        }
    }

    async fn reconnect_database(&self) -> Result<RecoveryOutcome> {
        let Some(database) = &self.database else {
            return Ok(RecoveryOutcome::Skipped(
                "no database configured".to_string(),
            ));
        };

        info!("Attempting database reconnection");
        database.reconnect().await?;
        Ok(RecoveryOutcome::Performed)
    }

    fn reclaim_memory(&self) -> Result<RecoveryOutcome> {
        match &self.reclaimer {
            Some(reclaim) => {
                info!("Running memory reclaimer");
                reclaim()?;
                Ok(RecoveryOutcome::Performed)
            }
            None => Ok(RecoveryOutcome::Skipped(
                "memory cleanup skipped, no reclaimer installed".to_string(),
            )),
        }
    }

    async fn restart_services(&self) -> Result<RecoveryOutcome> {
        let mut restarted = 0;
        let mut failures = Vec::new();

        for service in &self.services {
            if service.is_alive().await {
                continue;
            }
            info!(service = service.name(), "Attempting service restart");
            match service.restart().await {
                Ok(()) => restarted += 1,
                Err(e) => failures.push(format!("{}: {}", service.name(), e)),
            }
        }

        if !failures.is_empty() {
            return Err(MonitorError::recovery(format!(
                "service restart failed for {}",
                failures.join("; ")
            )));
        }
        if restarted == 0 {
            return Ok(RecoveryOutcome::Skipped("no services down".to_string()));
        }
        Ok(RecoveryOutcome::Performed)
    }
}

/// Tracks the last recovery attempt per probe and runs attempts outside cooldown
#[derive(Debug)]
pub struct RecoveryCoordinator {
    last_attempts: Mutex<HashMap<ProbeName, Instant>>,
    cooldown: Duration,
    timeout: Duration,
}

impl RecoveryCoordinator {
    pub fn new(timeout: Duration) -> Self {
        Self::with_cooldown(RECOVERY_COOLDOWN, timeout)
    }

    pub fn with_cooldown(cooldown: Duration, timeout: Duration) -> Self {
        Self {
            last_attempts: Mutex::new(HashMap::new()),
            cooldown,
            timeout,
        }
    }

    /// Claim an attempt for `probe`, recording it immediately
    ///
    /// Returns false while the previous attempt is inside the cooldown.
    pub fn try_begin(&self, probe: ProbeName) -> bool {
        let now = Instant::now();
        let mut last_attempts = self.last_attempts.lock();

        if let Some(previous) = last_attempts.get(&probe) {
            if now.duration_since(*previous) < self.cooldown {
                return false;
            }
        }

        last_attempts.insert(probe, now);
        true
    }

    /// Attempt recovery for each probe not in cooldown
    ///
    /// Returns the probes an attempt was started for. Failures are logged
    /// and never stop the remaining attempts.
    pub async fn recover(&self, probes: &[ProbeName], actions: &RecoveryActions) -> Vec<ProbeName> {
        let mut attempted = Vec::new();

        for &probe in probes {
            if !self.try_begin(probe) {
                debug!(probe = %probe, "Recovery in cooldown, skipping");
                continue;
            }
            attempted.push(probe);

            let guarded = AssertUnwindSafe(actions.run(probe)).catch_unwind();
            match tokio::time::timeout(self.timeout, guarded).await {
                Ok(Ok(Ok(RecoveryOutcome::Performed))) => {
                    info!(probe = %probe, "Recovery attempt completed");
                }
                Ok(Ok(Ok(RecoveryOutcome::Skipped(reason)))) => {
                    info!(probe = %probe, "Recovery skipped: {}", reason);
                }
                Ok(Ok(Err(e))) => {
                    error!(probe = %probe, "Recovery attempt failed: {}", e);
                }
                Ok(Err(panic)) => {
                    error!(probe = %probe, "Recovery attempt panicked: {}", panic_message(panic.as_ref()));
                }
                Err(_) => {
                    error!(probe = %probe, "Recovery attempt timed out after {:?}", self.timeout);
                }
            }
        }

        attempted
    }

    /// Snapshot of the last attempt instant per probe
    pub fn attempts(&self) -> HashMap<ProbeName, Instant> {
        self.last_attempts.lock().clone()
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}
