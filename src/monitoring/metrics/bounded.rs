//! Bounded collection utilities for metrics

use std::collections::VecDeque;

/// Snapshots retained in the metrics buffer
pub const MAX_METRIC_SNAPSHOTS: usize = 100;

/// Requests retained for the one-minute performance window
pub(super) const MAX_RECENT_REQUESTS: usize = 1_000;

/// Push onto a `VecDeque` while keeping it within a maximum length
pub(super) trait BoundedPush<T> {
    fn push_bounded(&mut self, value: T, max_size: usize);
}

impl<T> BoundedPush<T> for VecDeque<T> {
    /// Oldest entries are evicted first
    #[inline]
    fn push_bounded(&mut self, value: T, max_size: usize) {
        while self.len() >= max_size {
            self.pop_front();
        }
        self.push_back(value);
    }
}
