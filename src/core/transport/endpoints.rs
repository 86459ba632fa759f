//! Creation endpoints of the customer-management API
//!
//! [`CustomerApi`] is what the upload state machine talks to. [`ApiEndpoints`]
//! is the production implementation over a shared [`TransportClient`]; tests
//! substitute scripted fakes.

use super::client::{ApiRequest, TransportClient};
use super::contract::{
    AddressCreated, ApiEnvelope, CreatedEntity, CustomFieldCreated, CustomerCreated,
};
use super::error::{TransportError, TransportResult};
use crate::config::{ApiConfig, EndpointConfig};
use crate::core::types::{LocationType, RemoteId};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// Payload of the create-customer call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    pub password: String,
}

/// Payload of the create-address call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAddress {
    pub customer_id: RemoteId,
    /// Full name of the customer
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    pub address: String,
    pub house_no: String,
    pub latitude: f64,
    pub longitude: f64,
    pub loc_type: LocationType,
}

/// Payload of the create-custom-field call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCustomField {
    pub customer_id: RemoteId,
    pub label: String,
    pub display_name: String,
    pub data_type: String,
    pub value: String,
    pub data: String,
    pub input: String,
    pub app_side: i64,
    pub required: i64,
    pub template_id: String,
    pub is_new: bool,
}

/// Remote operations needed to create one customer and its sub-entities.
///
/// Each method performs exactly one request and returns the identifier the
/// API assigned.
#[async_trait]
pub trait CustomerApi: Send + Sync {
    async fn create_customer(&self, customer: &NewCustomer) -> TransportResult<RemoteId>;

    async fn create_address(&self, address: &NewAddress) -> TransportResult<RemoteId>;

    async fn create_custom_field(&self, field: &NewCustomField) -> TransportResult<RemoteId>;
}

/// Wraps a payload with the account `api_key` the API expects in the body
#[derive(Serialize)]
struct Keyed<'a, T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
    #[serde(flatten)]
    payload: &'a T,
}

/// [`CustomerApi`] over HTTP
#[derive(Debug, Clone)]
pub struct ApiEndpoints {
    client: TransportClient,
    paths: EndpointConfig,
    api_key: Option<String>,
}

impl ApiEndpoints {
    pub fn new(client: TransportClient, config: &ApiConfig) -> Self {
        Self {
            client,
            paths: config.endpoints.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Releases the underlying transport
    pub fn close(self) {
        self.client.close();
    }

    async fn create<T, R>(&self, path: &str, payload: &T) -> TransportResult<RemoteId>
    where
        T: Serialize + Sync,
        R: CreatedEntity,
    {
        let request = ApiRequest::post(path).json(&Keyed {
            api_key: self.api_key.as_deref(),
            payload,
        })?;
        let envelope: Option<ApiEnvelope<R>> = self.client.request(request).await?;

        let url = self
            .client
            .url_for(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| path.to_string());
        let envelope = envelope.ok_or_else(|| {
            TransportError::response_shape(&url, None, "response carries no body", "")
        })?;

        debug!(message = %envelope.message, "Creation acknowledged");
        envelope.into_remote_id(&url)
    }
}

#[async_trait]
impl CustomerApi for ApiEndpoints {
    async fn create_customer(&self, customer: &NewCustomer) -> TransportResult<RemoteId> {
        self.create::<_, CustomerCreated>(&self.paths.create_customer, customer).await
    }

    async fn create_address(&self, address: &NewAddress) -> TransportResult<RemoteId> {
        self.create::<_, AddressCreated>(&self.paths.create_address, address).await
    }

    async fn create_custom_field(&self, field: &NewCustomField) -> TransportResult<RemoteId> {
        self.create::<_, CustomFieldCreated>(&self.paths.create_custom_field, field).await
    }
}
