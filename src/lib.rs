//! # resultify
//!
//! Materialize completed query-job results from object storage as
//! client-consumable artifacts. A job, executed elsewhere, leaves behind an
//! ordered set of gzipped CSV partition files plus a `manifest.json`
//! describing them; this crate reconstructs the single logical result set
//! from that manifest alone and renders it as either a merged CSV document
//! or a JSON array of typed records, streaming, without holding the full
//! result in memory.
//!
//! ## Features
//!
//! - **Single-header merge**: per-part header echoes are detected and
//!   dropped; the canonical header appears exactly once
//! - **Header inference**: manifests without declared columns infer them
//!   from the first readable part
//! - **Best-effort tolerance**: missing parts are skipped (configurable),
//!   their rows simply absent from the output
//! - **Typed JSON records**: int → float → bool → string coercion per cell
//! - **Any object store**: S3, R2, GCS, Azure, or local paths via one URI
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use resultify::{load_manifest, CsvMerger, MergeOptions, Deadline};
//!
//! #[tokio::main]
//! async fn main() -> resultify::Result<()> {
//!     let deadline = Deadline::none();
//!     let manifest = load_manifest("gs://results/jobs/j1/manifest.json", &deadline).await?;
//!     let csv = CsvMerger::new(MergeOptions::default()).merge(manifest).await?;
//!     std::io::Write::write_all(&mut std::io::stdout(), &csv)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! manifest.json ──> manifest::load_manifest ──> Manifest
//!                                                  │
//!                          ┌───────────────────────┴──────────────────────┐
//!                          │            merge::ResultSetReader            │
//!                          │  (per chunk: storage fetch → gunzip → lines  │
//!                          │   → parse → header reconcile → rows)        │
//!                          └───────────────┬──────────────┬───────────────┘
//!                                          │              │
//!                                 CsvMerger│              │RecordArrayWriter
//!                                          ▼              ▼
//!                                merged CSV bytes   JSON record array
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Service configuration
pub mod config;

/// Object storage access
pub mod storage;

/// Result manifest model and loading
pub mod manifest;

/// Partition file access
pub mod part;

/// Delimited-text decoding and type coercion
pub mod decode;

/// Result-set reconstruction (CSV merge and JSON record array)
pub mod merge;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use manifest::{load_manifest, ChunkRef, Manifest};
pub use merge::{CsvMerger, MergeOptions, RecordArrayWriter};
pub use types::{ByteStream, Deadline, JsonObject, JsonValue, MissingPartPolicy};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
