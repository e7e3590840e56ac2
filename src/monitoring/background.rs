//! Background task implementations for HealthMonitor

use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::alerts;
use super::system::HealthMonitor;
use super::types::{HealthState, ProbeName, SystemMetrics};

impl HealthMonitor {
    /// Arm the periodic tasks; each ends when `shutdown` fires
    pub(super) fn start_background_tasks(&self, shutdown: watch::Receiver<()>) {
        // Health check task
        let monitor = self.clone();
        let period = self.config.health_check_interval();
        spawn_periodic(period, shutdown.clone(), move || {
            let monitor = monitor.clone();
            async move { monitor.run_health_cycle().await }
        });

        // Metrics collection task
        let monitor = self.clone();
        let period = self.config.metrics_interval();
        spawn_periodic(period, shutdown, move || {
            let monitor = monitor.clone();
            async move { monitor.collect_metrics() }
        });
    }

    /// Forward alerts to the notification channel, if one is configured
    pub(super) fn spawn_notifier(&self, mut shutdown: watch::Receiver<()>) {
        let Some(channel) = self.notifier.clone() else {
            return;
        };

        let mut alerts = self.events.subscribe_alerts();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = shutdown.changed() => break,
                    received = alerts.recv() => match received {
                        Ok(alert) => {
                            if !channel.supports_level(alert.level) {
                                continue;
                            }
                            if let Err(e) = channel.send(&alert).await {
                                warn!(channel = channel.name(), "Failed to send alert notification: {}", e);
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Notification task lagged behind alerts");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                }
            }
            debug!("Notification task stopped");
        });
    }

    /// One health-check tick: run probes, raise alerts, attempt recovery
    pub(super) async fn run_health_cycle(&self) {
        let checks = self.health.check_all(&self.events).await;

        let mut critical = Vec::new();
        for alert in alerts::evaluate(&checks) {
            warn!(level = %alert.level, "{}", alert.message);
            self.events.emit_alert(alert);
        }

        for (name, check) in &checks {
            if check.status == HealthState::Critical {
                critical.push(*name);
            }
        }

        if self.config.enable_auto_recovery && !critical.is_empty() {
            self.attempt_recovery(&critical).await;
        }
    }

    async fn attempt_recovery(&self, probes: &[ProbeName]) {
        let attempted = self.recovery.recover(probes, &self.recovery_actions).await;
        if !attempted.is_empty() {
            info!(probes = ?attempted, "Attempted recovery");
        }
    }

    /// One metrics tick: take a snapshot, buffer it and publish it
    pub(super) fn collect_metrics(&self) -> SystemMetrics {
        let checks = self.health.snapshot();
        let snapshot = self.metrics.collect(self.uptime(), &checks);
        self.events.emit_metrics(snapshot.clone());
        snapshot
    }
}

/// Run `tick` every `period`, first one period from now
///
/// A slow tick delays the schedule instead of bursting to catch up.
fn spawn_periodic<F, Fut, T>(period: Duration, mut shutdown: watch::Receiver<()>, mut tick: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = interval.tick() => {
                    tick().await;
                }
            }
        }
    });
}
