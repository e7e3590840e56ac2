//! Alerting and auto-recovery tests

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, FakeDatabase, FakeService, StubSampler};
    use health_monitor::{AlertLevel, HealthMonitor, HealthState, ProbeName, Result};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// A dropped database connection is re-established by recovery
    #[tokio::test(start_paused = true)]
    async fn test_database_reconnects_after_outage() {
        let database = Arc::new(FakeDatabase::default());
        database.set_down(true);
        let monitor = HealthMonitor::builder(ConfigFactory::create())
            .sampler(Arc::new(StubSampler::new(30, 100)))
            .database(database.clone())
            .build()
            .unwrap();
        let mut alerts = monitor.subscribe_alerts();

        monitor.start().await;

        let alert = alerts.try_recv().unwrap();
        assert_eq!(alert.level, AlertLevel::Critical);
        assert_eq!(alert.message, "Critical health checks: database");
        assert_eq!(database.reconnects(), 1);

        tokio::time::sleep(Duration::from_millis(30_100)).await;
        let status = monitor.get_health_status();
        assert_eq!(status[&ProbeName::Database].status, HealthState::Healthy);
        assert_eq!(status[&ProbeName::Database].details["connected"], true);

        monitor.stop();
    }

    /// A failing restart does not stop recovery of other probes
    #[tokio::test(start_paused = true)]
    async fn test_recovery_failures_are_isolated() {
        let database = Arc::new(FakeDatabase::default());
        database.set_down(true);
        let service = Arc::new(FakeService::new("search"));
        service.set_alive(false);
        service.fail_restarts();

        let monitor = HealthMonitor::builder(ConfigFactory::create())
            .sampler(Arc::new(StubSampler::new(30, 100)))
            .database(database.clone())
            .service(service.clone())
            .build()
            .unwrap();

        monitor.start().await;

        assert_eq!(service.restarts(), 1);
        assert_eq!(database.reconnects(), 1);
        let attempts = monitor.recovery_attempts();
        assert!(attempts.contains_key(&ProbeName::Database));
        assert!(attempts.contains_key(&ProbeName::Services));
        assert!(monitor.is_running());

        monitor.stop();
    }

    /// The reclaimer runs at most once per cooldown window
    #[tokio::test(start_paused = true)]
    async fn test_memory_reclaimer_cooldown() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let monitor = HealthMonitor::builder(ConfigFactory::create())
            .sampler(Arc::new(StubSampler::new(95, 600)))
            .memory_reclaimer(Arc::new(move || -> Result<()> {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))
            .build()
            .unwrap();

        monitor.start().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(240)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(90)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        monitor.stop();
    }

    /// Warnings never trigger recovery
    #[tokio::test(start_paused = true)]
    async fn test_warning_only_alerts() {
        let monitor = HealthMonitor::builder(ConfigFactory::create())
            .sampler(Arc::new(StubSampler::new(85, 100)))
            .build()
            .unwrap();
        let mut alerts = monitor.subscribe_alerts();

        monitor.start().await;
        tokio::time::sleep(Duration::from_millis(30_100)).await;
        monitor.stop();

        let mut levels = Vec::new();
        while let Ok(alert) = alerts.try_recv() {
            levels.push(alert.level);
        }
        assert_eq!(levels, vec![AlertLevel::Warning, AlertLevel::Warning]);
        assert!(monitor.recovery_attempts().is_empty());
    }
}
