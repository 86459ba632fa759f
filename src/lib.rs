//! # Customer Uploader
//!
//! Bulk migration of cleaned customer records into a remote
//! customer-management API.
//!
//! ## Features
//!
//! - **Per-record state machine**: user, then addresses, then custom fields,
//!   with a `success`, `partial` or `failed` outcome per record
//! - **Concurrent batches**: every pending record runs in its own worker over
//!   one pooled HTTP client
//! - **Fault isolation**: a worker that panics only fails its own record
//! - **Idempotent resume**: records that already carry a customer id are
//!   skipped, so a results file can be fed back in as input
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use customer_uploader::{BatchUploader, Config, ResultPersister, load_records};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None).await?;
//!     config.validate()?;
//!
//!     let mut records = load_records(&config.paths.input)?;
//!     let summary = BatchUploader::from_config(&config.upload)
//!         .with_persister(ResultPersister::new(&config.paths.results))
//!         .run(&config.api, &mut records)
//!         .await?;
//!
//!     println!("{} succeeded, {} failed", summary.success(), summary.failed());
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use crate::core::transport::{
    ApiEndpoints, ApiRequest, CustomerApi, TransportClient, TransportError, TransportResult,
};
pub use crate::core::types::{Address, CustomField, LocationType, Record, RemoteId, UploadStatus};
pub use crate::core::upload::{BatchSummary, BatchUploader, RecordUploader};
pub use storage::{ResultPersister, StorageError, load_records};
pub use utils::error::{Result, UploaderError};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build information embedded by `build.rs`
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    /// Seconds since the Unix epoch
    pub build_time: &'static str,
    pub git_hash: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
        }
    }
}

pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
