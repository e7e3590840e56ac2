//! Monitor lifecycle and query surface tests

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, StubSampler};
    use health_monitor::monitoring::metrics::MAX_METRIC_SNAPSHOTS;
    use health_monitor::{HealthMonitor, HealthState, ProbeName};
    use std::sync::Arc;
    use std::time::Duration;

    fn monitor(sampler: Arc<StubSampler>) -> HealthMonitor {
        HealthMonitor::builder(ConfigFactory::create())
            .sampler(sampler)
            .build()
            .unwrap()
    }

    /// Every probe has a result as soon as start returns
    #[tokio::test(start_paused = true)]
    async fn test_status_available_after_start() {
        let monitor = monitor(Arc::new(StubSampler::new(30, 100)));
        monitor.start().await;

        let status = monitor.get_health_status();
        assert_eq!(
            status.keys().copied().collect::<Vec<_>>(),
            ProbeName::ALL.to_vec()
        );
        assert!(status.values().all(|c| c.status == HealthState::Healthy));
        assert!(monitor.is_healthy());
        assert_eq!(monitor.get_metrics(None).len(), 1);

        monitor.stop();
    }

    /// Critical memory needs both high usage and a large RSS
    #[tokio::test(start_paused = true)]
    async fn test_memory_pressure_levels() {
        let sampler = Arc::new(StubSampler::new(95, 600));
        let monitor = monitor(sampler.clone());
        monitor.start().await;

        let status = monitor.get_health_status();
        assert_eq!(status[&ProbeName::Memory].status, HealthState::Critical);
        assert_eq!(monitor.get_overall_health(), HealthState::Critical);

        sampler.set(95, 100);
        tokio::time::sleep(Duration::from_millis(30_100)).await;

        let status = monitor.get_health_status();
        assert_eq!(status[&ProbeName::Memory].status, HealthState::Warning);
        assert_eq!(monitor.get_overall_health(), HealthState::Warning);
        assert!(!monitor.is_healthy());

        monitor.stop();
    }

    /// The metrics buffer keeps only the newest snapshots, oldest first
    #[tokio::test(start_paused = true)]
    async fn test_metrics_history_is_bounded() {
        let monitor = monitor(Arc::new(StubSampler::new(30, 100)));
        monitor.start().await;

        // 120 ticks plus the immediate collection
        tokio::time::sleep(Duration::from_millis(1_200_100)).await;
        monitor.stop();

        let all = monitor.get_metrics(Some(500));
        assert_eq!(all.len(), MAX_METRIC_SNAPSHOTS);
        assert!(all.windows(2).all(|w| w[0].uptime_secs <= w[1].uptime_secs));
        assert_eq!(all.last().map(|m| m.uptime_secs), Some(1_200));

        let recent = monitor.get_metrics(Some(5));
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[..], all[all.len() - 5..]);
    }

    /// One health-check event per probe per tick, in probe order
    #[tokio::test(start_paused = true)]
    async fn test_health_check_events_per_tick() {
        let monitor = monitor(Arc::new(StubSampler::new(30, 100)));
        let mut events = monitor.subscribe_health_checks();

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(60_100)).await;
        monitor.stop();

        let mut names = Vec::new();
        while let Ok(check) = events.try_recv() {
            names.push(check.name);
        }

        let expected: Vec<ProbeName> = ProbeName::ALL.iter().copied().cycle().take(15).collect();
        assert_eq!(names, expected);
    }

    /// Returned status is a copy; mutating it does not touch the monitor
    #[tokio::test(start_paused = true)]
    async fn test_status_is_a_snapshot() {
        let monitor = monitor(Arc::new(StubSampler::new(30, 100)));
        monitor.start().await;
        monitor.stop();

        let mut status = monitor.get_health_status();
        status.clear();

        assert_eq!(monitor.get_health_status().len(), ProbeName::ALL.len());
    }

    /// Clones observe and control the same monitor
    #[tokio::test(start_paused = true)]
    async fn test_clones_share_state() {
        let monitor = monitor(Arc::new(StubSampler::new(30, 100)));
        let handle = monitor.clone();

        handle.start().await;
        assert!(monitor.is_running());
        assert_eq!(monitor.get_metrics(None).len(), 1);

        monitor.stop();
        assert!(!handle.is_running());
    }

    /// Requests recorded by the host show up in the next snapshot
    #[tokio::test(start_paused = true)]
    async fn test_request_performance_in_snapshots() {
        let monitor = monitor(Arc::new(StubSampler::new(30, 100)));
        monitor.start().await;

        monitor.record_request(Duration::from_millis(100), true);
        monitor.record_request(Duration::from_millis(300), false);
        tokio::time::sleep(Duration::from_millis(10_100)).await;
        monitor.stop();

        let latest = monitor.get_metrics(Some(1)).pop().unwrap();
        assert_eq!(latest.performance.requests_per_minute, 2);
        assert_eq!(latest.performance.avg_response_time_ms, 200.0);
        assert_eq!(latest.performance.error_rate, 50.0);
    }
}
