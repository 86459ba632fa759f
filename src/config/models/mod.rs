//! Configuration data models
//!
//! This module defines all configuration structures used by the uploader.

pub mod api;
pub mod upload;

// Re-export all configuration types
pub use api::*;
pub use upload::*;

/// Default API base URL
pub fn default_base_url() -> String {
    "https://api.yelo.red".to_string()
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default customer creation path
pub fn default_create_customer_path() -> String {
    "/open/admin/customer/add".to_string()
}

/// Default address creation path
pub fn default_create_address_path() -> String {
    "/open/admin/customer/address/add".to_string()
}

/// Default custom field creation path
pub fn default_create_custom_field_path() -> String {
    "/open/admin/customer/custom/add".to_string()
}

/// Default cleaned records file
pub fn default_input_path() -> std::path::PathBuf {
    std::path::PathBuf::from("clean_data").join("clean_data.json")
}

/// Default results file
pub fn default_results_path() -> std::path::PathBuf {
    std::path::PathBuf::from("results").join("results.json")
}
