//! Batch and file path validators

use super::trait_def::Validate;
use crate::config::models::*;

impl Validate for UploadConfig {
    fn validate(&self) -> Result<(), String> {
        if self.concurrency == Some(0) {
            return Err("Upload concurrency must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Validate for PathsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.input.as_os_str().is_empty() {
            return Err("Input records path cannot be empty".to_string());
        }
        if self.results.as_os_str().is_empty() {
            return Err("Results path cannot be empty".to_string());
        }
        if self.input == self.results {
            return Err(format!(
                "Results path must differ from the input path: {}",
                self.input.display()
            ));
        }
        Ok(())
    }
}
