//! Error handling for the uploader
//!
//! Component errors (transport, storage) live next to their components; this
//! module holds the crate-level error that the entry points return.

pub mod error;

pub use error::*;
