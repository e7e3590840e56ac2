//! Database collaborator

use crate::utils::error::Result;

/// Connection to the store the monitored service depends on
#[async_trait::async_trait]
pub trait DatabaseHandle: Send + Sync + std::fmt::Debug {
    /// Round-trip a trivial query; the probe times this call
    async fn ping(&self) -> Result<()>;

    /// Open connections, if the handle pools them
    fn connection_count(&self) -> u32 {
        0
    }

    /// Drop and re-establish the connection
    async fn reconnect(&self) -> Result<()>;
}
