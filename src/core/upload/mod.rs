//! Upload orchestration
//!
//! - `record`: the per-record state machine
//! - `batch`: concurrent fan-out over a record list, tally and persistence
//! - `summary`: status counts and the end-of-run report

pub mod batch;
pub mod record;
pub mod summary;


pub use batch::BatchUploader;
pub use record::{RecordUploader, StepOutcome};
pub use summary::{BatchSummary, StatusCounts, tally};
