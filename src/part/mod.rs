//! Partition file access
//!
//! Opens one partition file from object storage, applies decompression, and
//! yields its text lines lazily.

mod reader;

#[cfg(test)]
mod tests;

pub use reader::{open_part, Compression, PartLines};
