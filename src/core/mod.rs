//! Core upload pipeline
//!
//! Data flows one way: records -> `upload` -> `transport` -> remote API.

pub mod transport;
pub mod types;
pub mod upload;
