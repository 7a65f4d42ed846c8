//! Result manifest model and loading
//!
//! A completed job leaves behind a `manifest.json` describing its output:
//! the column list, advisory row/byte counters, and the ordered list of
//! partition files. This module owns that document's schema and fetching.

mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use loader::{load_manifest, parse_manifest};
pub use types::{ChunkRef, Manifest};
