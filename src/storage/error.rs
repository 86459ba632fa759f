use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading input records or writing result files
#[derive(Error, Debug)]
pub enum StorageError {
    /// Input file does not exist
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File could not be read or written
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Records could not be represented as JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Input file is not a JSON array of records
    #[error("Invalid data in {}: {message}", .path.display())]
    InvalidFormat { path: PathBuf, message: String },
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            message: message.into(),
        }
    }
}
