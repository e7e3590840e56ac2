//! Notification channel implementations

use crate::monitoring::types::{AlertEvent, AlertLevel};
use crate::utils::error::{MonitorError, Result};
use std::time::Duration;

/// Notification channel trait
#[async_trait::async_trait]
pub trait NotificationChannel: Send + Sync + std::fmt::Debug {
    /// Send a notification
    async fn send(&self, alert: &AlertEvent) -> Result<()>;

    /// Get channel name
    fn name(&self) -> &str;

    /// Check if channel accepts alerts at this level
    fn supports_level(&self, level: AlertLevel) -> bool;
}

/// Posts alerts as JSON to an HTTP endpoint
#[derive(Debug)]
pub struct WebhookChannel {
    url: String,
    client: reqwest::Client,
    min_level: AlertLevel,
    timeout: Duration,
}

impl WebhookChannel {
    pub fn new(url: impl Into<String>, min_level: AlertLevel) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            min_level,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait::async_trait]
impl NotificationChannel for WebhookChannel {
    async fn send(&self, alert: &AlertEvent) -> Result<()> {
        let payload = serde_json::json!({
            "source": "health-monitor",
            "alert": alert,
        });

        let response = self
            .client
            .post(&self.url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MonitorError::notification(format!(
                "Webhook returned HTTP {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }

    fn supports_level(&self, level: AlertLevel) -> bool {
        level >= self.min_level
    }
}
