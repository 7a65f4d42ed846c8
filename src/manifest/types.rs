//! Manifest document schema
//!
//! Field names and optionality mirror what the result-writing worker
//! actually produces; anything it may omit gets a lenient default here.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Descriptor of one completed result set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Output column names, in order. May be empty; the header is then
    /// inferred from the first readable partition file.
    #[serde(default)]
    pub columns: Vec<String>,

    /// Total row count across all parts. Advisory only; -1 = unknown.
    #[serde(default = "unknown_counter")]
    pub row_count: i64,

    /// Payload format of the parts, e.g. "csv"
    #[serde(default = "default_format")]
    pub format: String,

    /// Compression applied to each part, e.g. "gzip". Absent = uncompressed.
    #[serde(default)]
    pub compression: Option<String>,

    /// Ordered partition files making up the result
    #[serde(default)]
    pub chunks: Vec<ChunkRef>,
}

/// Reference to one partition file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkRef {
    /// Absolute object location, e.g. `gs://bucket/jobs/<id>/part-00000.csv.gz`
    pub uri: String,

    /// Rows in this part. Advisory only; -1 = unknown.
    #[serde(default = "unknown_counter")]
    pub rows: i64,

    /// Compressed size in bytes. Advisory only; -1 = unknown.
    #[serde(default = "unknown_counter")]
    pub bytes: i64,
}

fn unknown_counter() -> i64 {
    -1
}

fn default_format() -> String {
    "csv".to_string()
}

impl Manifest {
    /// Whether the manifest declares an authoritative column list
    pub fn has_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Advisory row count usable for pre-sizing buffers, if known.
    ///
    /// Never correct to rely on for termination; parts are read to EOF.
    pub fn estimated_rows(&self) -> Option<usize> {
        usize::try_from(self.row_count).ok()
    }

    /// Check the structural invariant: at least one chunk.
    pub fn validate(&self) -> Result<()> {
        if self.chunks.is_empty() {
            return Err(Error::manifest_invalid("manifest lists no chunks"));
        }
        Ok(())
    }
}
