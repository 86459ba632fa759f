//! Remote API configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Connection settings for the customer-management API
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Key the API expects inside every payload
    #[serde(default)]
    pub api_key: Option<String>,
    /// Bearer token attached as the Authorization header
    #[serde(default)]
    pub auth_token: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            auth_token: None,
            timeout: default_timeout(),
            endpoints: EndpointConfig::default(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.as_secs();
        self
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

// Secrets stay out of logs
impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

/// Relative paths of the three creation endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_create_customer_path")]
    pub create_customer: String,
    #[serde(default = "default_create_address_path")]
    pub create_address: String,
    #[serde(default = "default_create_custom_field_path")]
    pub create_custom_field: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            create_customer: default_create_customer_path(),
            create_address: default_create_address_path(),
            create_custom_field: default_create_custom_field_path(),
        }
    }
}
