//! Result-set reconstruction
//!
//! Drives partition files in manifest order through the line parser and
//! header reconciliation, and renders the result either as one merged CSV
//! document or as a JSON array of typed records.
//!
//! Both output paths share [`ResultSetReader`], which owns the sequential
//! walk: load-manifest has already happened by the time one is constructed,
//! then per chunk it opens, skips, or fails according to policy, and yields
//! rows in order. There is no cross-chunk parallelism; row order is the
//! product's contract.

mod csv;
mod header;
mod reader;
mod records;


pub use csv::CsvMerger;
pub use header::{FirstLine, HeaderReconciler};
pub use reader::{ResultSetReader, RowEvent};
pub use records::RecordArrayWriter;

use crate::types::{Deadline, MissingPartPolicy};

/// Per-request options shared by both output paths
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeOptions {
    /// What to do when a partition file fails to open
    pub missing_part: MissingPartPolicy,
    /// Request-scoped I/O deadline
    pub deadline: Deadline,
}

impl MergeOptions {
    /// Options with the given policy and no deadline
    pub fn with_policy(missing_part: MissingPartPolicy) -> Self {
        Self {
            missing_part,
            deadline: Deadline::none(),
        }
    }

    /// Set the request deadline
    #[must_use]
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }
}
