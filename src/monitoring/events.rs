//! Event subscription
//!
//! One broadcast channel per event kind. Every subscriber gets its own
//! bounded queue: a slow subscriber lags and loses its oldest events but
//! never blocks the tick that emits them.

use super::types::{AlertEvent, HealthCheck, SystemMetrics};
use tokio::sync::broadcast;
use tracing::trace;

/// Events buffered per subscriber before the oldest are dropped
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Fan-out of monitor events to any number of subscribers
#[derive(Debug, Clone)]
pub struct EventBus {
    health_checks: broadcast::Sender<HealthCheck>,
    alerts: broadcast::Sender<AlertEvent>,
    metrics: broadcast::Sender<SystemMetrics>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(EVENT_CHANNEL_CAPACITY)
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (health_checks, _) = broadcast::channel(capacity);
        let (alerts, _) = broadcast::channel(capacity);
        let (metrics, _) = broadcast::channel(capacity);

        Self {
            health_checks,
            alerts,
            metrics,
        }
    }

    /// One event per probe per tick
    pub fn subscribe_health_checks(&self) -> broadcast::Receiver<HealthCheck> {
        self.health_checks.subscribe()
    }

    pub fn subscribe_alerts(&self) -> broadcast::Receiver<AlertEvent> {
        self.alerts.subscribe()
    }

    pub fn subscribe_metrics(&self) -> broadcast::Receiver<SystemMetrics> {
        self.metrics.subscribe()
    }

    pub fn emit_health_check(&self, check: HealthCheck) {
        // No subscribers is not an error
        if self.health_checks.send(check).is_err() {
            trace!("No health check subscribers");
        }
    }

    pub fn emit_alert(&self, alert: AlertEvent) {
        if self.alerts.send(alert).is_err() {
            trace!("No alert subscribers");
        }
    }

    pub fn emit_metrics(&self, snapshot: SystemMetrics) {
        if self.metrics.send(snapshot).is_err() {
            trace!("No metrics subscribers");
        }
    }
}
