//! Masking of credentials in logged payloads

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// JSON string or number values under credential-like keys
static SECRET_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)"(api_key|password|token|auth_token|access_token|authorization)"\s*:\s*("(?:[^"\\]|\\.)*"|-?\d+)"#,
    )
    .expect("secret field pattern is valid")
});

static BEARER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)bearer\s+[A-Za-z0-9\-_.~+/=]+").expect("bearer pattern is valid"));

pub struct Sanitization;

impl Sanitization {
    /// Replaces credential values in a JSON text with `***`, keeping the keys
    /// so the log still shows which fields were sent.
    pub fn redact_payload(input: &str) -> String {
        let masked = SECRET_FIELD.replace_all(input, |caps: &Captures| {
            format!(r#""{}":"***""#, &caps[1])
        });
        BEARER.replace_all(&masked, "Bearer ***").into_owned()
    }

    /// Serializes `value` compactly and redacts it for a debug log line
    pub fn redact_json(value: &serde_json::Value) -> String {
        Self::redact_payload(&value.to_string())
    }
}
