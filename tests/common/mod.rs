//! Common test utilities for health-monitor

pub mod fixtures;

pub use fixtures::{ConfigFactory, FakeDatabase, FakeService, StubSampler};

/// Poll `cond` every 10ms until it holds or `timeout` elapses
pub async fn wait_until<F>(timeout: std::time::Duration, mut cond: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if cond() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    cond()
}
