//! Configuration loading from environment variables
//!
//! Variable names follow the `.env` files the cleaning pipeline already ships
//! with, so one `.env` drives both stages.

use super::Config;
use crate::utils::error::{Result, UploaderError};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

pub const ENV_BASE_URL: &str = "YELO_API_BASE_URL";
pub const ENV_TIMEOUT: &str = "DEFAULT_TIMEOUT";
pub const ENV_AUTH_TOKEN: &str = "YELO_API_TOKEN";
pub const ENV_API_KEY: &str = "YELO_API_KEY";
pub const ENV_CREATE_CUSTOMER_PATH: &str = "YELO_CREATE_CUSTOMER_PATH";
pub const ENV_CREATE_ADDRESS_PATH: &str = "YELO_CREATE_ADDRESS_PATH";
pub const ENV_CREATE_CUSTOM_FIELD_PATH: &str = "YELO_CREATE_CUSTOM_FIELD_PATH";
pub const ENV_CLEAN_DATA_DIR: &str = "CLEAN_DATA_DIR";
pub const ENV_CLEAN_DATA_FILE_NAME: &str = "CLEAN_DATA_FILE_NAME";
pub const ENV_RESULTS_DIR: &str = "RESULTS_DIR";
pub const ENV_RESULTS_FILE_NAME: &str = "RESULTS_FILE_NAME";
pub const ENV_CONCURRENCY: &str = "UPLOAD_CONCURRENCY";
pub const ENV_UPLOAD_CUSTOM_FIELDS: &str = "UPLOAD_CUSTOM_FIELDS";

impl Config {
    /// Overrides fields with values from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Overrides fields with values returned by `lookup`.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(base_url) = get(ENV_BASE_URL) {
            self.api.base_url = base_url;
        }
        if let Some(timeout) = get(ENV_TIMEOUT) {
            self.api.timeout = parse_var(ENV_TIMEOUT, &timeout)?;
        }
        if let Some(token) = get(ENV_AUTH_TOKEN) {
            self.api.auth_token = Some(token);
        }
        if let Some(api_key) = get(ENV_API_KEY) {
            self.api.api_key = Some(api_key);
        }
        if let Some(path) = get(ENV_CREATE_CUSTOMER_PATH) {
            self.api.endpoints.create_customer = path;
        }
        if let Some(path) = get(ENV_CREATE_ADDRESS_PATH) {
            self.api.endpoints.create_address = path;
        }
        if let Some(path) = get(ENV_CREATE_CUSTOM_FIELD_PATH) {
            self.api.endpoints.create_custom_field = path;
        }

        self.paths.input = join_dir_and_file(
            get(ENV_CLEAN_DATA_DIR),
            get(ENV_CLEAN_DATA_FILE_NAME),
            &self.paths.input,
        );
        self.paths.results = join_dir_and_file(
            get(ENV_RESULTS_DIR),
            get(ENV_RESULTS_FILE_NAME),
            &self.paths.results,
        );

        if let Some(concurrency) = get(ENV_CONCURRENCY) {
            self.upload.concurrency = Some(parse_var(ENV_CONCURRENCY, &concurrency)?);
        }
        if let Some(flag) = get(ENV_UPLOAD_CUSTOM_FIELDS) {
            self.upload.upload_custom_fields = parse_bool(ENV_UPLOAD_CUSTOM_FIELDS, &flag)?;
        }

        debug!("Configuration overrides applied from environment");
        Ok(())
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| UploaderError::config(format!("Invalid {}: {}", key, e)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(UploaderError::config(format!(
            "Invalid {}: expected a boolean, got '{}'",
            key, other
        ))),
    }
}

/// Combines a directory and file name override with the current path, keeping
/// whichever half was not overridden.
fn join_dir_and_file(dir: Option<String>, file: Option<String>, current: &Path) -> PathBuf {
    if dir.is_none() && file.is_none() {
        return current.to_path_buf();
    }
    let dir = dir
        .map(PathBuf::from)
        .or_else(|| current.parent().map(|p| p.to_path_buf()))
        .unwrap_or_default();
    let file = file
        .map(PathBuf::from)
        .or_else(|| current.file_name().map(PathBuf::from))
        .unwrap_or_default();
    dir.join(file)
}
