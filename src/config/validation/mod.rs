//! Configuration validation
//!
//! The validation is organized into several submodules:
//! - `trait_def`: Core Validate trait definition
//! - `api_validators`: API connection and endpoint validators
//! - `upload_validators`: Batch and file path validators
//! - `tests`: Test suite for all validators

mod api_validators;
mod trait_def;
mod upload_validators;

pub use trait_def::Validate;
