//! Integration tests for health-monitor
//!
//! These tests exercise the monitor through its public API only.

pub mod config_tests;
pub mod lifecycle_tests;
pub mod recovery_tests;
