//! Crate-level error type

use crate::core::transport::TransportError;
use crate::storage::StorageError;
use thiserror::Error;

/// Result type alias for the uploader
pub type Result<T> = std::result::Result<T, UploaderError>;

/// Errors that stop a run before or around the batch.
///
/// Per-record failures never surface here; they are recorded on the records.
#[derive(Error, Debug)]
pub enum UploaderError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport client could not be constructed
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Input or result file errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl UploaderError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
