//! Batch orchestration
//!
//! Every record still lacking a customer id gets its own worker. Workers run
//! concurrently over one shared [`CustomerApi`] and each one borrows its record
//! exclusively, so no locking is involved. A panic inside a worker is caught at
//! the worker boundary and only fails that record.

use super::record::RecordUploader;
use super::summary::{BatchSummary, tally};
use crate::config::{ApiConfig, UploadConfig};
use crate::core::transport::{ApiEndpoints, CustomerApi, TransportClient};
use crate::core::types::{Record, UploadStatus};
use crate::storage::ResultPersister;
use crate::utils::error::Result;
use chrono::Utc;
use futures::FutureExt;
use futures::stream::{self, StreamExt};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::{error, info, warn};

pub(crate) const WORKER_FAULT_MESSAGE: &str = "Unexpected worker failure";
const INTERRUPTED_MESSAGE: &str = "Interrupted by an unexpected worker failure";

/// Uploads a list of records and reports the outcome
#[derive(Debug, Clone, Default)]
pub struct BatchUploader {
    concurrency: Option<usize>,
    upload_custom_fields: bool,
    persister: Option<ResultPersister>,
}

impl BatchUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self {
            concurrency: config.concurrency,
            upload_custom_fields: config.upload_custom_fields,
            persister: None,
        }
    }

    /// Caps the number of records in flight; unset runs them all at once
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = Some(concurrency.max(1));
        self
    }

    pub fn with_custom_fields(mut self, enabled: bool) -> Self {
        self.upload_custom_fields = enabled;
        self
    }

    /// Writes the full record list through `persister` once all workers settle
    pub fn with_persister(mut self, persister: ResultPersister) -> Self {
        self.persister = Some(persister);
        self
    }

    /// Runs the batch against the HTTP API described by `api_config`.
    ///
    /// The transport client is only created when at least one record needs
    /// work, and it is closed before returning.
    pub async fn run(&self, api_config: &ApiConfig, records: &mut [Record]) -> Result<BatchSummary> {
        let started = Instant::now();
        let summary = partition(records);
        if summary.nothing_to_upload() {
            return Ok(nothing_to_upload(summary, started));
        }

        let client = TransportClient::new(api_config)?;
        let api = ApiEndpoints::new(client, api_config);
        let summary = self.process(&api, records, summary, started).await;
        api.close();
        Ok(summary)
    }

    /// Runs the batch against any [`CustomerApi`] implementation
    pub async fn run_with<A>(&self, api: &A, records: &mut [Record]) -> BatchSummary
    where
        A: CustomerApi + ?Sized,
    {
        let started = Instant::now();
        let summary = partition(records);
        if summary.nothing_to_upload() {
            return nothing_to_upload(summary, started);
        }
        self.process(api, records, summary, started).await
    }

    async fn process<A>(
        &self,
        api: &A,
        records: &mut [Record],
        mut summary: BatchSummary,
        started: Instant,
    ) -> BatchSummary
    where
        A: CustomerApi + ?Sized,
    {
        let pending = summary.total - summary.skipped;
        let limit = self.concurrency.unwrap_or(pending).max(1);
        info!(pending, concurrency = limit, "Starting concurrent upload");

        let uploader = RecordUploader::new(api).with_custom_fields(self.upload_custom_fields);
        let uploader = &uploader;

        let mut processed: Vec<usize> = stream::iter(
            records
                .iter_mut()
                .enumerate()
                .filter(|(_, record)| !record.is_created()),
        )
        .map(|(index, record)| async move {
            let outcome = AssertUnwindSafe(uploader.upload(&mut *record))
                .catch_unwind()
                .await;
            if let Err(payload) = outcome {
                contain_worker_fault(record, payload.as_ref());
            }
            index
        })
        .buffer_unordered(limit)
        .collect()
        .await;

        info!("Concurrent uploads finished. Processing results");

        processed.sort_unstable();
        summary.counts = tally(
            records
                .iter_mut()
                .enumerate()
                .filter(|(index, _)| processed.binary_search(index).is_ok())
                .map(|(_, record)| record),
        );

        if let Some(persister) = &self.persister {
            match persister.save(records) {
                Ok(()) => summary.results_path = Some(persister.path().to_path_buf()),
                Err(e) => {
                    error!("Failed to save results to {}: {}", persister.path().display(), e);
                    summary.persist_error = Some(e.to_string());
                }
            }
        }

        summary.elapsed = started.elapsed();
        summary.log();
        summary
    }
}

/// Logs the records left alone this run and starts the summary
fn partition(records: &[Record]) -> BatchSummary {
    let mut skipped = 0;
    for record in records.iter().filter(|r| r.is_created()) {
        info!(
            record = %record,
            customer_id = ?record.customer_id,
            "Record already processed. Skipping"
        );
        skipped += 1;
    }
    BatchSummary::new(records.len(), skipped, Utc::now())
}

fn nothing_to_upload(mut summary: BatchSummary, started: Instant) -> BatchSummary {
    warn!(
        total = summary.total,
        "No records to process. Nothing to upload"
    );
    summary.elapsed = started.elapsed();
    summary
}

/// Forces a record whose worker panicked into `failed`, keeping whatever the
/// worker managed to record before the fault.
fn contain_worker_fault(record: &mut Record, payload: &(dyn Any + Send)) {
    let reason = panic_message(payload);
    error!(
        record = %record,
        "Worker for record failed unexpectedly: {}",
        reason.as_deref().unwrap_or("unknown panic payload")
    );

    for address in record.addresses.iter_mut() {
        if address.upload_status == UploadStatus::Processing {
            address.upload_status = UploadStatus::Failed;
            address.error_message = Some(INTERRUPTED_MESSAGE.to_string());
        }
    }
    if let Some(fields) = record.custom_fields.as_mut() {
        for field in fields.iter_mut() {
            if field.upload_status == UploadStatus::Processing {
                field.upload_status = UploadStatus::Failed;
                field.error_message = Some(INTERRUPTED_MESSAGE.to_string());
            }
        }
    }

    if record.upload_status.is_terminal() {
        warn!(
            record = %record,
            status = %record.upload_status,
            "Worker failed after the record reached a terminal status; keeping it"
        );
        return;
    }

    record.upload_status = UploadStatus::Failed;
    if record.error_message.is_none() {
        record.error_message = Some(match reason {
            Some(reason) => format!("{}: {}", WORKER_FAULT_MESSAGE, reason),
            None => WORKER_FAULT_MESSAGE.to_string(),
        });
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<String> {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
}
