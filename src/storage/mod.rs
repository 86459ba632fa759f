//! Storage layer for the uploader
//!
//! Reads the cleaned customer records and writes the annotated results back to
//! disk. Both sides use the same JSON layout, so a results file can be fed into
//! the next run to resume where the previous one stopped.

/// Input record loading
pub mod records;
/// Result file persistence
pub mod results;

mod error;

pub use error::StorageError;
pub use records::load_records;
pub use results::ResultPersister;
