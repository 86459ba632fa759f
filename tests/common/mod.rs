//! Common test utilities
//!
//! - `fixtures`: record factories and sample files
//! - `mock_api`: `wiremock` server speaking the API's envelope format
//! - `fake_api`: in-process `CustomerApi` with scripted failures and panics

pub mod fake_api;
pub mod mock_api;

pub use fake_api::FakeApi;
pub use fixtures::RecordFactory;
pub use mock_api::MockApi;
