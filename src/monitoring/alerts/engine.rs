//! Alert evaluation over the registry

use crate::monitoring::types::{AlertEvent, AlertLevel, HealthCheck, HealthState, ProbeName};
use std::collections::BTreeMap;

/// Alerts for the current registry contents
///
/// At most one critical and one warning alert, critical first. Healthy
/// entries never alert.
pub fn evaluate(checks: &BTreeMap<ProbeName, HealthCheck>) -> Vec<AlertEvent> {
    [AlertLevel::Critical, AlertLevel::Warning]
        .into_iter()
        .filter_map(|level| {
            let state = match level {
                AlertLevel::Critical => HealthState::Critical,
                AlertLevel::Warning => HealthState::Warning,
            };
            let matching: Vec<HealthCheck> = checks
                .values()
                .filter(|check| check.status == state)
                .cloned()
                .collect();

            (!matching.is_empty()).then(|| build_alert(level, matching))
        })
        .collect()
}

fn build_alert(level: AlertLevel, checks: Vec<HealthCheck>) -> AlertEvent {
    let names: Vec<&str> = checks.iter().map(|check| check.name.as_str()).collect();
    let label = match level {
        AlertLevel::Critical => "Critical",
        AlertLevel::Warning => "Warning",
    };

    AlertEvent {
        id: uuid::Uuid::new_v4().to_string(),
        level,
        message: format!("{} health checks: {}", label, names.join(", ")),
        checks,
        timestamp: chrono::Utc::now(),
    }
}
