//! Transport layer for the customer-management API
//!
//! - `client`: pooled HTTP client and the generic request operation
//! - `contract`: typed response envelopes
//! - `endpoints`: the [`CustomerApi`] seam and its HTTP implementation
//! - `error`: typed transport failures

pub mod client;
pub mod contract;
pub mod endpoints;
pub mod error;

pub use client::{ApiRequest, TransportClient};
pub use contract::{
    AddressCreated, ApiEnvelope, CreatedEntity, CustomFieldCreated, CustomerCreated,
};
pub use endpoints::{ApiEndpoints, CustomerApi, NewAddress, NewCustomField, NewCustomer};
pub use error::{TransportError, TransportResult};
