//! Configuration management for the uploader
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional YAML
//! file, environment variables. CLI flags are applied on top by the binary.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{Result, UploaderError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the uploader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

impl Config {
    /// Load configuration from a YAML file, without environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| UploaderError::config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse configuration from YAML text. An empty document yields defaults.
    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| UploaderError::config(format!("Failed to parse config: {}", e)))
    }

    /// Load the optional YAML file, then apply environment overrides.
    ///
    /// Validation is left to the caller so CLI overrides can still be applied.
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                info!("Loading configuration from: {:?}", path);
                let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                    UploaderError::config(format!("Failed to read config file: {}", e))
                })?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.api
            .validate()
            .map_err(|e| UploaderError::config(format!("API config error: {}", e)))?;

        self.paths
            .validate()
            .map_err(|e| UploaderError::config(format!("Paths config error: {}", e)))?;

        self.upload
            .validate()
            .map_err(|e| UploaderError::config(format!("Upload config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| UploaderError::config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
