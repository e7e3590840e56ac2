//! Latest result per probe

use crate::monitoring::types::{HealthCheck, HealthState, ProbeName};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry {
    check: HealthCheck,
    observed_at: Instant,
}

/// Mapping of probe name to its most recent `HealthCheck`
///
/// One entry per probe at most; a new result replaces the previous one.
#[derive(Debug, Default)]
pub struct HealthRegistry {
    entries: BTreeMap<ProbeName, Entry>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result, replacing any earlier one for the same probe
    pub fn upsert(&mut self, check: HealthCheck) {
        self.entries.insert(
            check.name,
            Entry {
                check,
                observed_at: Instant::now(),
            },
        );
    }

    pub fn get(&self, name: ProbeName) -> Option<&HealthCheck> {
        self.entries.get(&name).map(|entry| &entry.check)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Owned copy of every entry
    pub fn snapshot(&self) -> BTreeMap<ProbeName, HealthCheck> {
        self.entries
            .iter()
            .map(|(name, entry)| (*name, entry.check.clone()))
            .collect()
    }

    /// Entries with exactly this status, in probe order
    pub fn with_status(&self, status: HealthState) -> Vec<HealthCheck> {
        self.entries
            .values()
            .filter(|entry| entry.check.status == status)
            .map(|entry| entry.check.clone())
            .collect()
    }

    /// Probes whose latest result is older than `max_age`
    pub fn stale(&self, max_age: Duration) -> Vec<ProbeName> {
        let now = Instant::now();
        self.entries
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.observed_at) > max_age)
            .map(|(name, _)| *name)
            .collect()
    }

    /// Highest severity across all entries; healthy when empty
    ///
    /// With `stale_after` set, a stale entry counts as at least a warning.
    pub fn overall(&self, stale_after: Option<Duration>) -> HealthState {
        let now = Instant::now();
        self.entries
            .values()
            .map(|entry| match stale_after {
                Some(max_age) if now.duration_since(entry.observed_at) > max_age => {
                    entry.check.status.max(HealthState::Warning)
                }
                _ => entry.check.status,
            })
            .max()
            .unwrap_or(HealthState::Healthy)
    }
}
