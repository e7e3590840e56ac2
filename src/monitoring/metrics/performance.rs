//! Request performance window

use super::bounded::{BoundedPush, MAX_RECENT_REQUESTS};
use crate::monitoring::types::PerformanceMetrics;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct RequestSample {
    at: Instant,
    duration_ms: f64,
    success: bool,
}

/// Requests observed by the host over the last minute
#[derive(Debug, Default)]
pub struct PerformanceTracker {
    samples: Mutex<VecDeque<RequestSample>>,
}

impl PerformanceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, duration: Duration, success: bool) {
        let sample = RequestSample {
            at: Instant::now(),
            duration_ms: duration.as_secs_f64() * 1000.0,
            success,
        };
        self.samples.lock().push_bounded(sample, MAX_RECENT_REQUESTS);
    }

    /// Summarise the window, discarding samples older than one minute
    pub fn summary(&self) -> PerformanceMetrics {
        let now = Instant::now();
        let mut samples = self.samples.lock();
        samples.retain(|s| now.duration_since(s.at) <= WINDOW);

        if samples.is_empty() {
            return PerformanceMetrics::default();
        }

        let count = samples.len();
        let total_ms: f64 = samples.iter().map(|s| s.duration_ms).sum();
        let failed = samples.iter().filter(|s| !s.success).count();

        PerformanceMetrics {
            avg_response_time_ms: total_ms / count as f64,
            requests_per_minute: count as u64,
            error_rate: failed as f64 / count as f64 * 100.0,
        }
    }
}
