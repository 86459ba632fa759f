//! Domain types for the upload pipeline

pub mod record;
pub mod status;

pub use record::{Address, CustomField, LocationType, Record, RemoteId};
pub use status::UploadStatus;
