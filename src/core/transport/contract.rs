//! Response contracts of the customer-management API
//!
//! Every creation endpoint answers `{"message": ..., "status": ..., "data": {...}}`.
//! Each endpoint names its identifier differently, so each gets its own `data`
//! type. Keys a type does not declare are ignored, which lets the address and
//! custom field replies echo the owning `customer_id` without it being taken
//! for their own id.

use super::error::{TransportError, TransportResult};
use crate::core::types::RemoteId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Standard response wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<i64>,
    pub data: T,
}

/// `data` payload of a creation endpoint
pub trait CreatedEntity: DeserializeOwned + Send {
    /// Identifier the API assigned to the new entity
    fn remote_id(&self) -> RemoteId;
}

/// Reply of the create-customer endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerCreated {
    pub customer_id: RemoteId,
}

/// Reply of the create-address endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressCreated {
    #[serde(alias = "address_id")]
    pub id: RemoteId,
}

/// Reply of the create-custom-field endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFieldCreated {
    #[serde(alias = "field_id")]
    pub id: RemoteId,
}

impl CreatedEntity for CustomerCreated {
    fn remote_id(&self) -> RemoteId {
        self.customer_id
    }
}

impl CreatedEntity for AddressCreated {
    fn remote_id(&self) -> RemoteId {
        self.id
    }
}

impl CreatedEntity for CustomFieldCreated {
    fn remote_id(&self) -> RemoteId {
        self.id
    }
}

impl<T: CreatedEntity> ApiEnvelope<T> {
    /// Extracts the identifier, rejecting the zero/negative placeholders the
    /// API sometimes returns alongside a 200.
    pub fn into_remote_id(self, url: &str) -> TransportResult<RemoteId> {
        let id = self.data.remote_id();
        if id <= 0 {
            return Err(TransportError::response_shape(
                url,
                self.status.and_then(|s| u16::try_from(s).ok()),
                format!(
                    "response carries no usable identifier (got {}, message '{}')",
                    id, self.message
                ),
                "",
            ));
        }
        Ok(id)
    }
}
