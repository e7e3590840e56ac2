//! Error statistics collaborator

use dashmap::DashMap;
use std::collections::HashMap;

/// Read-only view of the host's error-recovery counters
///
/// Values are opaque; only numeric ones are counted.
pub trait ErrorStatsSource: Send + Sync {
    fn recovery_stats(&self) -> HashMap<String, serde_json::Value>;
}

/// Source for hosts without an error handler
#[derive(Debug, Default, Clone, Copy)]
pub struct NoErrorStats;

impl ErrorStatsSource for NoErrorStats {
    fn recovery_stats(&self) -> HashMap<String, serde_json::Value> {
        HashMap::new()
    }
}

/// Named error counters the host increments as it handles errors
#[derive(Debug, Default)]
pub struct ErrorCounters {
    counters: DashMap<String, u64>,
}

impl ErrorCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment a counter by one
    pub fn record(&self, name: &str) {
        self.record_n(name, 1);
    }

    pub fn record_n(&self, name: &str, count: u64) {
        *self.counters.entry(name.to_string()).or_insert(0) += count;
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counters.get(name).map(|v| *v).unwrap_or(0)
    }

    pub fn reset(&self) {
        self.counters.clear();
    }
}

impl ErrorStatsSource for ErrorCounters {
    fn recovery_stats(&self) -> HashMap<String, serde_json::Value> {
        self.counters
            .iter()
            .map(|entry| (entry.key().clone(), serde_json::Value::from(*entry.value())))
            .collect()
    }
}

/// Sum every numeric value, ignoring anything else
pub fn sum_counters(stats: &HashMap<String, serde_json::Value>) -> f64 {
    stats
        .values()
        .filter_map(serde_json::Value::as_f64)
        .filter(|v| v.is_finite())
        .sum()
}
