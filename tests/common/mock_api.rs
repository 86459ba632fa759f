//! `wiremock` stand-in for the customer-management API

use customer_uploader::config::{ApiConfig, default_create_address_path, default_create_customer_path};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock server plus the API config pointing at it
pub struct MockApi {
    pub server: MockServer,
}

impl MockApi {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// API config aimed at the mock server with a one second timeout
    pub fn config(&self) -> ApiConfig {
        ApiConfig::new(self.server.uri())
            .with_api_key("test-key")
            .with_auth_token("test-token")
            .with_timeout(Duration::from_secs(1))
    }

    /// Every customer creation succeeds with `id`
    pub async fn customers_ok(&self, id: i64) {
        Mock::given(method("POST"))
            .and(path(default_create_customer_path()))
            .respond_with(created("Customer added", json!({ "customer_id": id })))
            .mount(&self.server)
            .await;
    }

    /// Every address creation succeeds with `id`
    pub async fn addresses_ok(&self, id: i64) {
        Mock::given(method("POST"))
            .and(path(default_create_address_path()))
            .respond_with(created("Address added", json!({ "id": id })))
            .mount(&self.server)
            .await;
    }

    /// Customer creation for `first_name` answers with `response`, ahead of
    /// the catch-all mocks
    pub async fn customer_replies(&self, first_name: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(default_create_customer_path()))
            .and(body_partial_json(json!({ "first_name": first_name })))
            .respond_with(response)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Address creation for `address` answers with `response`, ahead of the
    /// catch-all mocks
    pub async fn address_replies(&self, address: &str, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(default_create_address_path()))
            .and(body_partial_json(json!({ "address": address })))
            .respond_with(response)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// JSON bodies of every request received on `endpoint`
    pub async fn bodies(&self, endpoint: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path() == endpoint)
            .map(|request| serde_json::from_slice(&request.body).unwrap())
            .collect()
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }
}

/// 200 with the standard envelope around `data`
pub fn created(message: &str, data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "message": message,
        "status": 200,
        "data": data,
    }))
}

/// 422 validation failure
pub fn rejected(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(422).set_body_json(json!({
        "message": message,
        "status": 422,
        "data": {},
    }))
}

/// Successful answer delivered after the client timeout has passed
pub fn too_slow() -> ResponseTemplate {
    created("Customer added", json!({ "customer_id": 1 })).set_delay(Duration::from_millis(2500))
}
