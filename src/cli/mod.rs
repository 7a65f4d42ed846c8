//! CLI module
//!
//! Command-line interface for converting result sets.
//!
//! # Commands
//!
//! - `csv` - Merge all parts into a single CSV document
//! - `json` - Convert the result set to a JSON array of records
//! - `inspect` - Print a summary of a result manifest
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{serve, ServerConfig};
