//! Canonical header determination and per-part header dedup
//!
//! Each partition file is written independently and may restate the header
//! as its own first line; concatenating parts naively would repeat it
//! throughout the merged output. The reconciler fixes the canonical header
//! once, from the manifest's columns when declared, else from the first
//! line it sees, and classifies every part's first line against it.

use std::sync::Arc;

/// Verdict on the first parsed line of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstLine {
    /// Consumed as the canonical header or discarded as a restatement;
    /// not a data record either way
    Header,
    /// An ordinary data record that happens to open the chunk
    Data,
}

/// Tracks the canonical header across one request
#[derive(Debug, Default)]
pub struct HeaderReconciler {
    header: Option<Arc<Vec<String>>>,
}

impl HeaderReconciler {
    /// Reconciler with no header yet; the first chunk will supply it
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciler seeded from manifest columns. An empty list counts as
    /// undeclared, deferring to inference.
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self {
            header: if columns.is_empty() {
                None
            } else {
                Some(Arc::new(columns))
            },
        }
    }

    /// The canonical header, once determined. Immutable afterwards.
    pub fn header(&self) -> Option<&Arc<Vec<String>>> {
        self.header.as_ref()
    }

    /// Classify the first parsed line of a chunk.
    ///
    /// With no header fixed yet, the line becomes the canonical header.
    /// Otherwise it is a restated header exactly when its values equal the
    /// canonical header value-for-value; near-misses are data.
    pub fn reconcile_first(&mut self, cells: &[String]) -> FirstLine {
        match &self.header {
            None => {
                self.header = Some(Arc::new(cells.to_vec()));
                FirstLine::Header
            }
            Some(header) if header.as_slice() == cells => FirstLine::Header,
            Some(_) => FirstLine::Data,
        }
    }
}
