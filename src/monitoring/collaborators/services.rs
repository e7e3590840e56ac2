//! Dependent service collaborators

use crate::config::ServiceEndpoint;
use crate::utils::error::{MonitorError, Result};
use std::time::Duration;
use tracing::debug;

/// A service the monitored process depends on
#[async_trait::async_trait]
pub trait DependentService: Send + Sync + std::fmt::Debug {
    /// Service name
    fn name(&self) -> &str;

    /// Liveness check
    async fn is_alive(&self) -> bool;

    /// Restart the service
    async fn restart(&self) -> Result<()> {
        Err(MonitorError::unsupported(format!(
            "service '{}' cannot be restarted by the monitor",
            self.name()
        )))
    }
}

/// Service with a fixed liveness answer
#[derive(Debug, Clone)]
pub struct StaticService {
    name: String,
    alive: bool,
}

impl StaticService {
    /// A service that always reports up
    pub fn up(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alive: true,
        }
    }

    pub fn down(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alive: false,
        }
    }
}

#[async_trait::async_trait]
impl DependentService for StaticService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Service probed with an HTTP GET against its health URL
#[derive(Debug, Clone)]
pub struct HttpService {
    name: String,
    url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpService {
    pub fn new(name: impl Into<String>, url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    pub fn from_endpoint(endpoint: &ServiceEndpoint, timeout: Duration) -> Self {
        Self::new(endpoint.name.clone(), endpoint.url.clone(), timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl DependentService for HttpService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_alive(&self) -> bool {
        match self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => {
                let alive = response.status().is_success();
                if !alive {
                    debug!(service = %self.name, status = %response.status(), "Service health endpoint returned an error status");
                }
                alive
            }
            Err(e) => {
                debug!(service = %self.name, error = %e, "Service health request failed");
                false
            }
        }
    }
}
