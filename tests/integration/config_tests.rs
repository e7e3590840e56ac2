//! Configuration loading integration tests

#[cfg(test)]
mod tests {
    use crate::common::StubSampler;
    use health_monitor::config::Validate;
    use health_monitor::{HealthMonitor, HealthState, MonitorConfig, MonitorError, ProbeName};
    use std::io::Write;
    use std::sync::Arc;
    use tempfile::NamedTempFile;

    /// Thresholds from a YAML file drive probe evaluation
    #[tokio::test(start_paused = true)]
    async fn test_file_thresholds_apply_to_probes() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
health_check_interval_ms: 60000
metrics_interval_ms: 15000
alert_thresholds:
  memory_usage: 70
stale_after_cycles: 3
"#,
        )
        .unwrap();

        let config = MonitorConfig::from_file(file.path()).await.unwrap();
        assert_eq!(config.stale_after_cycles, Some(3));

        let monitor = HealthMonitor::builder(config)
            .sampler(Arc::new(StubSampler::new(75, 100)))
            .build()
            .unwrap();
        monitor.start().await;
        monitor.stop();

        let status = monitor.get_health_status();
        assert_eq!(status[&ProbeName::Memory].status, HealthState::Warning);
        assert_eq!(status[&ProbeName::System].status, HealthState::Warning);
        assert_eq!(monitor.config().metrics_interval_ms, 15_000);
    }

    /// Notifications need a usable endpoint
    #[test]
    fn test_notifications_require_endpoint() {
        let config = MonitorConfig {
            enable_notifications: true,
            notification_endpoint: None,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());

        let config = MonitorConfig {
            enable_notifications: true,
            notification_endpoint: Some("ftp://alerts.example.com".to_string()),
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_err());

        let result = HealthMonitor::new(config);
        assert!(matches!(result, Err(MonitorError::Config(_))));
    }

    /// Threshold percentages must lie in (0, 100]
    #[test]
    fn test_threshold_bounds() {
        let mut config = MonitorConfig::default();
        config.alert_thresholds.memory_usage = 120.0;
        assert!(config.validate().is_err());

        config.alert_thresholds.memory_usage = 100.0;
        assert!(config.validate().is_ok());

        config.alert_thresholds.error_rate = 0.0;
        assert!(config.validate().is_err());
    }

    /// Service endpoints must be http(s) URLs
    #[test]
    fn test_service_endpoint_validation() {
        let yaml = r#"
services:
  - name: cache
    url: "not a url"
"#;
        let err = MonitorConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, MonitorError::Config(_)));
    }
}
