//! Health checking
//!
//! A fixed, ordered list of probes is evaluated every health-check tick.
//! Each result overwrites that probe's entry in the registry.

mod checker;
mod context;
mod probes;
mod registry;


pub use checker::HealthChecker;
pub use context::ProbeContext;
pub use probes::{
    DatabaseProbe, ErrorRateProbe, HealthProbe, MEMORY_CRITICAL_PERCENT,
    MEMORY_CRITICAL_RSS_MB, MemoryProbe, ServicesProbe, SystemProbe, builtin_probes,
};
pub use registry::HealthRegistry;
