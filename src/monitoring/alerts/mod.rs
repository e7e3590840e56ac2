//! Alerting and recovery
//!
//! After each health-check tick the registry is scanned: critical entries
//! raise a critical alert and, when enabled, recovery; warning entries raise
//! a warning alert only.

mod channels;
mod engine;
mod recovery;


pub use channels::{NotificationChannel, WebhookChannel};
pub use engine::evaluate;
pub use recovery::{
    MemoryReclaimer, RECOVERY_COOLDOWN, RecoveryActions, RecoveryCoordinator, RecoveryOutcome,
};
