//! API connection validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::{debug, warn};
use url::Url;

impl Validate for ApiConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating API configuration");

        if self.base_url.trim().is_empty() {
            return Err("API base URL cannot be empty".to_string());
        }

        let url = Url::parse(&self.base_url)
            .map_err(|e| format!("API base URL '{}' is invalid: {}", self.base_url, e))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(format!(
                    "API base URL must use http:// or https:// scheme, got: {}",
                    scheme
                ));
            }
        }

        if url.host_str().is_none() {
            return Err("API base URL must have a valid host".to_string());
        }

        if self.timeout == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        if self.api_key.is_none() {
            warn!("No API key configured; payloads will be sent without api_key");
        }

        self.endpoints.validate()
    }
}

impl Validate for EndpointConfig {
    fn validate(&self) -> Result<(), String> {
        for (name, path) in [
            ("create_customer", &self.create_customer),
            ("create_address", &self.create_address),
            ("create_custom_field", &self.create_custom_field),
        ] {
            if path.trim().is_empty() {
                return Err(format!("Endpoint path '{}' cannot be empty", name));
            }
            if path.contains("://") {
                return Err(format!(
                    "Endpoint path '{}' must be relative to the base URL, got: {}",
                    name, path
                ));
            }
        }
        Ok(())
    }
}
