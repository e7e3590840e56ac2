//! Helper functions for creating specific error types

use super::types::MonitorError;

impl MonitorError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn probe<P: Into<String>, S: Into<String>>(probe: P, message: S) -> Self {
        Self::Probe {
            probe: probe.into(),
            message: message.into(),
        }
    }

    pub fn recovery<S: Into<String>>(message: S) -> Self {
        Self::Recovery(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::Database(message.into())
    }

    pub fn service<S: Into<String>>(message: S) -> Self {
        Self::Service(message.into())
    }

    pub fn notification<S: Into<String>>(message: S) -> Self {
        Self::Notification(message.into())
    }

    pub fn metrics<S: Into<String>>(message: S) -> Self {
        Self::Metrics(message.into())
    }

    pub fn unsupported<S: Into<String>>(message: S) -> Self {
        Self::Unsupported(message.into())
    }

    /// Whether the error came from an exceeded deadline
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::HttpClient(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// Text of a caught panic payload
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
