//! Loading cleaned customer records

use super::StorageError;
use crate::core::types::Record;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, error, info};

/// Loads and validates the records stored at `path`.
///
/// The file must hold a JSON array. Each element is validated on its own so
/// the error names the first offending record.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<Record>, StorageError> {
    let path = path.as_ref();
    info!("Loading customer records from: {}", path.display());

    if !path.is_file() {
        error!("Data file not found at: {}", path.display());
        return Err(StorageError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| StorageError::io(path, e))?;

    let raw: Value = serde_json::from_str(&content)
        .map_err(|e| StorageError::invalid_format(path, format!("invalid JSON: {}", e)))?;

    let Value::Array(items) = raw else {
        return Err(StorageError::invalid_format(
            path,
            "root element must be an array of customer records",
        ));
    };

    let records = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<Record>(item).map_err(|e| {
                StorageError::invalid_format(path, format!("record {}: {}", index, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let already_created = records.iter().filter(|r| r.is_created()).count();
    debug!(already_created, "Records carrying a customer id");
    info!(
        "Loaded {} customer records from {}",
        records.len(),
        path.display()
    );

    Ok(records)
}
