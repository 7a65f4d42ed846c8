//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Materialize completed query-job results from object storage
#[derive(Parser, Debug)]
#[command(name = "resultify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Service configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Merge all parts into a single CSV document
    Csv {
        /// Manifest location (gs://, s3://, r2://, az://, or local path)
        manifest: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort instead of skipping parts that fail to open
        #[arg(long)]
        strict: bool,
    },

    /// Convert the result set to a JSON array of records
    Json {
        /// Manifest location (gs://, s3://, r2://, az://, or local path)
        manifest: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Abort instead of skipping parts that fail to open
        #[arg(long)]
        strict: bool,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print a summary of a result manifest
    Inspect {
        /// Manifest location
        manifest: String,
    },

    /// Start HTTP server mode
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },
}
