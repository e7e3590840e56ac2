//! Built-in health probes

use super::context::ProbeContext;
use crate::monitoring::collaborators::sum_counters;
use crate::monitoring::types::{HealthCheck, HealthState, ProbeName};
use crate::utils::error::Result;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::time::Instant;

/// Memory is critical only above this usage percentage...
pub const MEMORY_CRITICAL_PERCENT: f64 = 90.0;

/// ...and with the process holding more than this much resident memory
pub const MEMORY_CRITICAL_RSS_MB: f64 = 500.0;

/// One named health evaluation
///
/// An `Err` means the probe could not measure at all; degraded states are
/// reported through the returned `HealthCheck`.
#[async_trait::async_trait]
pub trait HealthProbe: Send + Sync {
    fn name(&self) -> ProbeName;

    async fn evaluate(&self, ctx: &ProbeContext) -> Result<HealthCheck>;
}

/// The fixed probe set in tick order
pub fn builtin_probes() -> Vec<Box<dyn HealthProbe>> {
    vec![
        Box::new(SystemProbe),
        Box::new(DatabaseProbe),
        Box::new(MemoryProbe),
        Box::new(ErrorRateProbe),
        Box::new(ServicesProbe),
    ]
}

/// Monitor uptime and memory pressure against the configured threshold
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProbe;

#[async_trait::async_trait]
impl HealthProbe for SystemProbe {
    fn name(&self) -> ProbeName {
        ProbeName::System
    }

    async fn evaluate(&self, ctx: &ProbeContext) -> Result<HealthCheck> {
        let memory = ctx.sampler.memory()?;
        let cpu = ctx.sampler.cpu();
        let uptime = ctx.uptime();
        let usage = memory.usage_percent();

        let status = if usage > ctx.thresholds.memory_usage {
            HealthState::Warning
        } else {
            HealthState::Healthy
        };

        Ok(HealthCheck::new(
            ProbeName::System,
            status,
            format!(
                "System uptime: {} minutes, memory usage: {:.1}%",
                uptime.as_secs() / 60,
                usage
            ),
            json!({
                "uptime_secs": uptime.as_secs(),
                "memory": memory,
                "memory_usage_percent": usage,
                "cpu": cpu,
                "thresholds": ctx.thresholds,
            }),
        ))
    }
}

/// Connectivity and latency of the database collaborator
#[derive(Debug, Default, Clone, Copy)]
pub struct DatabaseProbe;

#[async_trait::async_trait]
impl HealthProbe for DatabaseProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Database
    }

    async fn evaluate(&self, ctx: &ProbeContext) -> Result<HealthCheck> {
        let Some(database) = &ctx.database else {
            return Ok(HealthCheck::new(
                ProbeName::Database,
                HealthState::Healthy,
                "No database configured",
                json!({ "configured": false, "connected": false }),
            ));
        };

        let start = Instant::now();
        match database.ping().await {
            Ok(()) => {
                let response_time_ms = start.elapsed().as_millis() as u64;
                let status = if response_time_ms as f64 > ctx.thresholds.response_time {
                    HealthState::Warning
                } else {
                    HealthState::Healthy
                };

                Ok(HealthCheck::new(
                    ProbeName::Database,
                    status,
                    format!("Database responding in {}ms", response_time_ms),
                    json!({
                        "configured": true,
                        "connected": true,
                        "response_time_ms": response_time_ms,
                        "threshold_ms": ctx.thresholds.response_time,
                        "connections": database.connection_count(),
                    }),
                ))
            }
            Err(e) => Ok(HealthCheck::new(
                ProbeName::Database,
                HealthState::Critical,
                format!("Database connection failed: {}", e),
                json!({
                    "configured": true,
                    "connected": false,
                    "error": e.to_string(),
                }),
            )),
        }
    }
}

/// Memory pressure with a stricter critical condition than `SystemProbe`
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryProbe;

#[async_trait::async_trait]
impl HealthProbe for MemoryProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Memory
    }

    async fn evaluate(&self, ctx: &ProbeContext) -> Result<HealthCheck> {
        let memory = ctx.sampler.memory()?;
        let usage = memory.usage_percent();
        let rss_mb = memory.rss_mb();

        // Both conditions must hold; high usage alone is normal churn.
        let status = if usage > MEMORY_CRITICAL_PERCENT && rss_mb > MEMORY_CRITICAL_RSS_MB {
            HealthState::Critical
        } else if usage > ctx.thresholds.memory_usage {
            HealthState::Warning
        } else {
            HealthState::Healthy
        };

        Ok(HealthCheck::new(
            ProbeName::Memory,
            status,
            format!("Memory usage: {:.1}%, RSS: {:.0}MB", usage, rss_mb),
            json!({
                "used_bytes": memory.used_bytes,
                "total_bytes": memory.total_bytes,
                "rss_bytes": memory.rss_bytes,
                "usage_percent": usage,
                "rss_mb": rss_mb,
                "threshold": ctx.thresholds.memory_usage,
            }),
        ))
    }
}

/// Error rate derived from the error handler's counters
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorRateProbe;

#[async_trait::async_trait]
impl HealthProbe for ErrorRateProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Errors
    }

    async fn evaluate(&self, ctx: &ProbeContext) -> Result<HealthCheck> {
        let stats = ctx.error_stats.recovery_stats();
        let total = sum_counters(&stats);

        // Measured over at least one minute so a fresh monitor does not spike.
        let minutes = (ctx.uptime().as_secs_f64() / 60.0).max(1.0);
        let error_rate = total / minutes;

        let status = if error_rate > ctx.thresholds.error_rate {
            HealthState::Warning
        } else {
            HealthState::Healthy
        };

        Ok(HealthCheck::new(
            ProbeName::Errors,
            status,
            format!(
                "Error rate: {:.2} errors/min ({} total)",
                error_rate, total
            ),
            json!({
                "total_errors": total,
                "error_rate": error_rate,
                "threshold": ctx.thresholds.error_rate,
                "stats": stats,
            }),
        ))
    }
}

/// Liveness of every dependent service
#[derive(Debug, Default, Clone, Copy)]
pub struct ServicesProbe;

#[async_trait::async_trait]
impl HealthProbe for ServicesProbe {
    fn name(&self) -> ProbeName {
        ProbeName::Services
    }

    async fn evaluate(&self, ctx: &ProbeContext) -> Result<HealthCheck> {
        let mut results = Vec::with_capacity(ctx.services.len());
        for service in &ctx.services {
            results.push((service.name(), service.is_alive().await));
        }

        // A repeated name is up only if every instance is
        let mut services: BTreeMap<String, bool> = BTreeMap::new();
        for (name, up) in &results {
            *services.entry(name.to_string()).or_insert(true) &= *up;
        }

        let down: Vec<&str> = services
            .iter()
            .filter(|(_, up)| !**up)
            .map(|(name, _)| name.as_str())
            .collect();

        let (status, message) = if down.is_empty() {
            (
                HealthState::Healthy,
                format!("All {} services operational", results.len()),
            )
        } else {
            (
                HealthState::Critical,
                format!("Services down: {}", down.join(", ")),
            )
        };

        Ok(HealthCheck::new(
            ProbeName::Services,
            status,
            message,
            json!({ "services": services }),
        ))
    }
}
