//! Writing the annotated record list

use super::StorageError;
use crate::core::types::Record;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes the final record list, statuses included, to one JSON file
#[derive(Debug, Clone)]
pub struct ResultPersister {
    path: PathBuf,
}

impl ResultPersister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serializes `records` as an indented UTF-8 JSON array, replacing any
    /// existing file. The parent directory must already exist.
    pub fn save(&self, records: &[Record]) -> Result<(), StorageError> {
        let mut bytes = serde_json::to_vec_pretty(records)?;
        bytes.push(b'\n');

        let mut file =
            std::fs::File::create(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        file.write_all(&bytes)
            .and_then(|()| file.sync_all())
            .map_err(|e| StorageError::io(&self.path, e))?;

        info!(
            "Saved {} records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }
}
