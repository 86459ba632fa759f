//! HTTP transport for the customer-management API
//!
//! One [`TransportClient`] is built per batch run and shared by every worker.
//! It owns a pooled `reqwest::Client`, the resolved base URL and the default
//! headers. Each call is one request: no retries happen here.

use super::error::{TransportError, TransportResult};
use crate::config::ApiConfig;
use crate::utils::logging::Sanitization;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// One call against the API, relative to the client's base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub query: Vec<(String, String)>,
    pub expected_status: StatusCode,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: Vec::new(),
            expected_status: StatusCode::OK,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Serializes a typed payload into the request body
    pub fn json<T: Serialize + ?Sized>(mut self, payload: &T) -> TransportResult<Self> {
        let value = serde_json::to_value(payload).map_err(|e| {
            TransportError::generic(format!("Failed to serialize payload for {}: {}", self.path, e))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Uses an already built JSON value as the body
    pub fn raw_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn expect_status(mut self, status: StatusCode) -> Self {
        self.expected_status = status;
        self
    }
}

/// Pooled HTTP client bound to one base URL
#[derive(Debug, Clone)]
pub struct TransportClient {
    http: Client,
    base_url: Url,
    headers: HeaderMap,
    timeout: Duration,
}

impl TransportClient {
    /// Builds the client from the API section of the configuration
    pub fn new(config: &ApiConfig) -> TransportResult<Self> {
        let timeout = config.timeout_duration();
        let base_url = normalize_base_url(&config.base_url)?;
        let headers = default_headers(config.auth_token.as_deref())?;

        let http = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(32)
            .tcp_nodelay(true)
            .build()
            .map_err(|e| TransportError::generic(format!("Failed to create HTTP client: {}", e)))?;

        info!("Transport client initialized for base URL: {}", base_url);
        Ok(Self {
            http,
            base_url,
            headers,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves a relative endpoint path against the base URL
    pub fn url_for(&self, path: &str) -> TransportResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TransportError::generic(format!("Invalid endpoint path '{}': {}", path, e)))
    }

    /// Sends one request and validates the response.
    ///
    /// Returns `Ok(None)` for a 204 or an empty body, otherwise the body
    /// deserialized as `R`. The status must be 2xx and equal to
    /// `request.expected_status`.
    pub async fn request<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> TransportResult<Option<R>> {
        let url = self.url_for(&request.path)?;
        let url_str = url.to_string();

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(self.headers.clone());
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let http_request = builder.build().map_err(|e| {
            TransportError::generic(format!("Failed to build request for {}: {}", url_str, e))
        })?;

        info!(method = %request.method, path = %request.path, "Sending request");
        debug!(headers = ?loggable_headers(http_request.headers()), "Request headers");
        if let Some(body) = &request.body {
            debug!(body = %Sanitization::redact_json(body), "Request body");
        }

        let response = self
            .http
            .execute(http_request)
            .await
            .map_err(|e| TransportError::from_reqwest(&e, &url_str, self.timeout))?;

        let status = response.status();
        info!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            "Response received"
        );

        let text = response
            .text()
            .await
            .map_err(|e| TransportError::from_reqwest(&e, &url_str, self.timeout))?;
        if !text.is_empty() {
            debug!(body = %Sanitization::redact_payload(&text), "Response body");
        }

        if !status.is_success() {
            warn!(status = status.as_u16(), "Request to {} failed", url_str);
            return Err(TransportError::http_status(url_str, status.as_u16(), text));
        }

        if status != request.expected_status {
            warn!(
                expected = request.expected_status.as_u16(),
                got = status.as_u16(),
                "Unexpected success status from {}",
                url_str
            );
            return Err(TransportError::http_status(url_str, status.as_u16(), text));
        }

        if status == StatusCode::NO_CONTENT || text.trim().is_empty() {
            debug!("Request to {} returned no content", url_str);
            return Ok(None);
        }

        let json: Value = serde_json::from_str(&text).map_err(|e| {
            TransportError::response_shape(
                &url_str,
                Some(status.as_u16()),
                format!("body is not valid JSON: {}", e),
                text.clone(),
            )
        })?;

        serde_json::from_value(json).map(Some).map_err(|e| {
            TransportError::response_shape(
                &url_str,
                Some(status.as_u16()),
                format!("unexpected response shape: {}", e),
                text,
            )
        })
    }

    /// `GET` expecting 200; query parameters are appended as given
    pub async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> TransportResult<Option<R>> {
        let request = query
            .iter()
            .fold(ApiRequest::get(path), |req, (k, v)| req.query(*k, *v));
        self.request(request).await
    }

    /// `POST` expecting 200 and a non-empty body of type `R`
    pub async fn post<P, R>(&self, path: &str, payload: &P) -> TransportResult<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = ApiRequest::post(path).json(payload)?;
        match self.request(request).await? {
            Some(body) => Ok(body),
            None => {
                let url = self
                    .url_for(path)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| path.to_string());
                Err(TransportError::response_shape(
                    url,
                    None,
                    "expected a response body, got none",
                    "",
                ))
            }
        }
    }

    /// Releases the connection pool held by this handle
    pub fn close(self) {
        info!("Transport client for {} closed", self.base_url);
        drop(self.http);
    }
}

fn normalize_base_url(base_url: &str) -> TransportResult<Url> {
    let mut base = base_url.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base)
        .map_err(|e| TransportError::generic(format!("Invalid base URL '{}': {}", base_url, e)))
}

fn default_headers(auth_token: Option<&str>) -> TransportResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

    if let Some(token) = auth_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| TransportError::generic(format!("Invalid auth token: {}", e)))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Header pairs safe to log; sensitive values are left out entirely
fn loggable_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .filter(|(name, value)| !value.is_sensitive() && *name != &AUTHORIZATION)
        .map(|(name, value)| {
            (
                name.to_string(),
                value.to_str().unwrap_or("<binary>").to_string(),
            )
        })
        .collect()
}
