//! Outcome tally of a batch run

use crate::core::types::{Record, UploadStatus};
use crate::utils::format_duration;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub(crate) const UNEXPECTED_STATE_MESSAGE: &str =
    "Processing did not complete or ended in an unexpected state";

/// Terminal status counts over the records processed in one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub success: usize,
    pub partial: usize,
    pub failed: usize,
    /// Records that ended outside the three terminal statuses and were
    /// counted as failed
    pub anomalies: usize,
}

impl StatusCounts {
    pub fn processed(&self) -> usize {
        self.success + self.partial + self.failed
    }
}

/// Counts the terminal status of every record handed in.
///
/// A record still `unset` or `processing` is an anomaly: it is logged, moved
/// to `failed` with an explanatory message, and counted as failed.
pub fn tally<'a>(records: impl IntoIterator<Item = &'a mut Record>) -> StatusCounts {
    let mut counts = StatusCounts::default();

    for record in records {
        let status = record.upload_status;
        match status {
            UploadStatus::Success => counts.success += 1,
            UploadStatus::Partial => counts.partial += 1,
            UploadStatus::Failed => {
                counts.failed += 1;
                if let Some(reason) = &record.error_message {
                    debug!(record = %record, "Final failure reason: {}", reason);
                }
            }
            UploadStatus::Unset | UploadStatus::Processing => {
                warn!(
                    record = %record,
                    status = %record.upload_status,
                    "Record ended with unexpected status. Counting as failed"
                );
                record.upload_status = UploadStatus::Failed;
                if record.error_message.is_none() {
                    record.error_message = Some(UNEXPECTED_STATE_MESSAGE.to_string());
                }
                counts.failed += 1;
                counts.anomalies += 1;
            }
        }
    }

    counts
}

/// Report of one batch run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Records in the input list
    pub total: usize,
    /// Records that already carried a customer id and were left untouched
    pub skipped: usize,
    #[serde(flatten)]
    pub counts: StatusCounts,
    /// Where the results were written, if they were
    pub results_path: Option<PathBuf>,
    pub persist_error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl BatchSummary {
    pub(crate) fn new(total: usize, skipped: usize, started_at: DateTime<Utc>) -> Self {
        Self {
            total,
            skipped,
            counts: StatusCounts::default(),
            results_path: None,
            persist_error: None,
            started_at,
            elapsed: Duration::ZERO,
        }
    }

    /// Records attempted in this run
    pub fn processed(&self) -> usize {
        self.counts.processed()
    }

    pub fn success(&self) -> usize {
        self.counts.success
    }

    pub fn partial(&self) -> usize {
        self.counts.partial
    }

    pub fn failed(&self) -> usize {
        self.counts.failed
    }

    /// True when nothing needed uploading
    pub fn nothing_to_upload(&self) -> bool {
        self.total == self.skipped
    }

    pub fn persisted(&self) -> bool {
        self.results_path.is_some()
    }

    /// Emits the end-of-run summary
    pub fn log(&self) {
        info!("--- Bulk Upload Summary ---");
        info!("Total records: {}", self.total);
        info!("Already processed (skipped): {}", self.skipped);
        info!("Processed this run: {}", self.processed());
        info!("Successful: {}", self.counts.success);
        info!("Partial: {}", self.counts.partial);
        info!("Failed: {}", self.counts.failed);
        if self.counts.anomalies > 0 {
            warn!("Records ending in an unexpected state: {}", self.counts.anomalies);
        }
        match (&self.results_path, &self.persist_error) {
            (Some(path), _) => info!("Results written to {}", path.display()),
            (None, Some(e)) => error!("Results were not written: {}", e),
            (None, None) => info!("Results were not written"),
        }
        info!(
            "Started at {}, elapsed {}",
            self.started_at.to_rfc3339(),
            format_duration(self.elapsed.as_millis() as u64)
        );
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
