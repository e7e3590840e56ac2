//! Validate trait shared by configuration structures

/// Implemented by every configuration section that can be checked before use
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
