//! Validation trait definition

/// Implemented by every configuration section; the error is a human readable
/// description of the first problem found.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
