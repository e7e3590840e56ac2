//! Configuration validation

mod monitor_validators;
mod trait_def;

pub use trait_def::Validate;
