//! Integration tests
//!
//! These exercise the public API of the crate against a mock HTTP server and
//! real files in temporary directories.

pub mod storage_tests;
pub mod transport_tests;
