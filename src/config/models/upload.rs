//! Batch and file configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where records are read from and results are written to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_input_path")]
    pub input: PathBuf,
    #[serde(default = "default_results_path")]
    pub results: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: default_input_path(),
            results: default_results_path(),
        }
    }
}

/// Batch behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Maximum records in flight; `None` launches every record at once
    #[serde(default)]
    pub concurrency: Option<usize>,
    /// Post custom fields instead of leaving them untouched
    #[serde(default)]
    pub upload_custom_fields: bool,
}
