//! Typed failures raised by the transport client
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | Timeout | the request exceeded the configured deadline |
//! | ConnectionFailure | no response was received (DNS, refused, reset) |
//! | HttpStatus | the status was not 2xx, or not the expected code |
//! | ResponseShape | the body was not JSON or did not match the contract |
//! | Generic | anything else on the client side |

use std::time::Duration;

/// Maximum number of body characters carried into error messages
const BODY_PREVIEW_CHARS: usize = 200;

/// Result type alias for transport calls
pub type TransportResult<T> = std::result::Result<T, TransportError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },

    #[error("Connection error for {url}: {message}")]
    ConnectionFailure { url: String, message: String },

    #[error("HTTP error {status} for {url}{}", preview(.body))]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from {url}: {message}{}", preview(.body))]
    ResponseShape {
        url: String,
        status: Option<u16>,
        message: String,
        body: String,
    },

    #[error("Client error: {message}")]
    Generic { message: String },
}

impl TransportError {
    pub fn timeout(url: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            url: url.into(),
            timeout,
        }
    }

    pub fn connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConnectionFailure {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn http_status(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    pub fn response_shape(
        url: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::ResponseShape {
            url: url.into(),
            status,
            message: message.into(),
            body: body.into(),
        }
    }

    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Classifies a reqwest failure for the request sent to `url`
    pub fn from_reqwest(err: &reqwest::Error, url: &str, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::timeout(url, timeout)
        } else if err.is_connect() {
            Self::connection(url, err.to_string())
        } else if err.is_decode() {
            Self::response_shape(url, err.status().map(|s| s.as_u16()), err.to_string(), "")
        } else {
            Self::generic(format!("Request to {} failed: {}", url, err))
        }
    }

    /// HTTP status attached to the failure, if a response was received
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::ResponseShape { status, .. } => *status,
            _ => None,
        }
    }

    /// Short name of the failure category, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "timeout",
            Self::ConnectionFailure { .. } => "connection_failure",
            Self::HttpStatus { .. } => "http_status",
            Self::ResponseShape { .. } => "response_shape",
            Self::Generic { .. } => "generic",
        }
    }
}

fn preview(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return String::new();
    }
    let mut preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    if body.chars().count() > BODY_PREVIEW_CHARS {
        preview.push_str("...");
    }
    format!(" (response: {})", preview)
}
