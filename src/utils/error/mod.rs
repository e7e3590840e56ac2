//! Error handling for the health monitor

mod helpers;
mod types;

pub(crate) use helpers::panic_message;
pub use types::{MonitorError, Result};
