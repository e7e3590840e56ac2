//! Prometheus exposition of monitor state

use prometheus::{Encoder, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::system::HealthMonitor;
use super::types::{HealthCheck, HealthState, SystemMetrics};
use crate::utils::error::{MonitorError, Result};

/// Gauges mirroring the latest health checks and metrics snapshot
#[derive(Clone)]
pub struct PrometheusExporter {
    registry: Registry,
    probe_status: IntGaugeVec,
    overall_status: IntGauge,
    rss_bytes: IntGauge,
    heap_used_bytes: IntGauge,
    uptime_seconds: IntGauge,
    errors_total: IntGauge,
    requests_per_minute: IntGauge,
}

fn state_value(state: HealthState) -> i64 {
    match state {
        HealthState::Healthy => 0,
        HealthState::Warning => 1,
        HealthState::Critical => 2,
    }
}

fn prometheus_err(e: prometheus::Error) -> MonitorError {
    MonitorError::metrics(e.to_string())
}

impl PrometheusExporter {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let probe_status = IntGaugeVec::new(
            Opts::new(
                "health_probe_status",
                "Latest probe result: 0 healthy, 1 warning, 2 critical",
            ),
            &["probe"],
        )
        .map_err(prometheus_err)?;
        let overall_status = IntGauge::new(
            "health_overall_status",
            "Highest severity across all probes",
        )
        .map_err(prometheus_err)?;
        let rss_bytes = IntGauge::new("health_process_rss_bytes", "Resident set size of the process")
            .map_err(prometheus_err)?;
        let heap_used_bytes = IntGauge::new("health_memory_used_bytes", "Memory in use")
            .map_err(prometheus_err)?;
        let uptime_seconds = IntGauge::new("health_uptime_seconds", "Seconds since the monitor was created")
            .map_err(prometheus_err)?;
        let errors_total = IntGauge::new("health_errors_total", "Errors reported by the error statistics source")
            .map_err(prometheus_err)?;
        let requests_per_minute = IntGauge::new(
            "health_requests_per_minute",
            "Requests recorded over the last minute",
        )
        .map_err(prometheus_err)?;

        registry
            .register(Box::new(probe_status.clone()))
            .map_err(prometheus_err)?;
        registry
            .register(Box::new(overall_status.clone()))
            .map_err(prometheus_err)?;
        registry
            .register(Box::new(rss_bytes.clone()))
            .map_err(prometheus_err)?;
        registry
            .register(Box::new(heap_used_bytes.clone()))
            .map_err(prometheus_err)?;
        registry
            .register(Box::new(uptime_seconds.clone()))
            .map_err(prometheus_err)?;
        registry
            .register(Box::new(errors_total.clone()))
            .map_err(prometheus_err)?;
        registry
            .register(Box::new(requests_per_minute.clone()))
            .map_err(prometheus_err)?;

        Ok(Self {
            registry,
            probe_status,
            overall_status,
            rss_bytes,
            heap_used_bytes,
            uptime_seconds,
            errors_total,
            requests_per_minute,
        })
    }

    pub fn observe_check(&self, check: &HealthCheck) {
        self.probe_status
            .with_label_values(&[check.name.as_str()])
            .set(state_value(check.status));
    }

    pub fn observe_overall(&self, state: HealthState) {
        self.overall_status.set(state_value(state));
    }

    pub fn observe_metrics(&self, snapshot: &SystemMetrics) {
        self.rss_bytes
            .set(i64::try_from(snapshot.memory.rss_bytes).unwrap_or(i64::MAX));
        self.heap_used_bytes
            .set(i64::try_from(snapshot.memory.used_bytes).unwrap_or(i64::MAX));
        self.uptime_seconds
            .set(i64::try_from(snapshot.uptime_secs).unwrap_or(i64::MAX));
        self.errors_total
            .set(i64::try_from(snapshot.errors.total).unwrap_or(i64::MAX));
        self.requests_per_minute
            .set(i64::try_from(snapshot.performance.requests_per_minute).unwrap_or(i64::MAX));
    }

    /// Text exposition of every gauge
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(prometheus_err)?;
        String::from_utf8(buffer).map_err(|e| MonitorError::metrics(e.to_string()))
    }

    /// Keep the gauges in step with `monitor` events
    ///
    /// Seeds from the monitor's current state first, so gauges are populated
    /// even when spawned after `start`. The task holds no strong reference to
    /// the monitor and ends once every clone of it is dropped.
    pub fn spawn(&self, monitor: &HealthMonitor) -> JoinHandle<()> {
        let mut checks = monitor.subscribe_health_checks();
        let mut metrics = monitor.subscribe_metrics();

        for check in monitor.get_health_status().values() {
            self.observe_check(check);
        }
        self.observe_overall(monitor.get_overall_health());
        if let Some(latest) = monitor.get_metrics(Some(1)).last() {
            self.observe_metrics(latest);
        }

        let exporter = self.clone();
        let health = Arc::downgrade(&monitor.health);
        let stale_after = monitor.config.stale_after();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    received = checks.recv() => match received {
                        Ok(check) => {
                            exporter.observe_check(&check);
                            if let Some(health) = health.upgrade() {
                                exporter.observe_overall(health.registry().read().overall(stale_after));
                            }
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Exporter lagged behind health checks");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    received = metrics.recv() => match received {
                        Ok(snapshot) => exporter.observe_metrics(&snapshot),
                        Err(RecvError::Lagged(skipped)) => {
                            warn!(skipped, "Exporter lagged behind metrics");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
            debug!("Prometheus exporter stopped");
        })
    }
}
