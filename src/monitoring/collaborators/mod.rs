//! Seams into the systems the monitor observes
//!
//! The monitor never owns a database, a service or an error handler. It is
//! handed trait objects for them and only reads through these interfaces
//! (plus the recovery hooks on database and services).

mod database;
mod errors;
mod services;


pub use database::DatabaseHandle;
pub use errors::{ErrorCounters, ErrorStatsSource, NoErrorStats, sum_counters};
pub use services::{DependentService, HttpService, StaticService};
