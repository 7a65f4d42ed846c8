//! CLI command execution

use std::path::Path;

use futures::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::config::{load_config, ServiceConfig};
use crate::error::{Error, Result};
use crate::manifest::load_manifest;
use crate::merge::{CsvMerger, MergeOptions, RecordArrayWriter};
use crate::types::{ByteStream, MissingPartPolicy};

use super::commands::{Cli, Commands};
use super::server::{serve, ServerConfig};

/// Executes the parsed CLI command
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a runner for the parsed arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the selected command
    pub async fn run(self) -> Result<()> {
        let config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => ServiceConfig::default(),
        };

        match self.cli.command {
            Commands::Csv {
                manifest,
                output,
                strict,
            } => run_csv(&config, &manifest, output.as_deref(), strict).await,
            Commands::Json {
                manifest,
                output,
                strict,
                pretty,
            } => run_json(&config, &manifest, output.as_deref(), strict, pretty).await,
            Commands::Inspect { manifest } => run_inspect(&config, &manifest).await,
            Commands::Serve { port } => {
                let port = port.unwrap_or(config.port);
                serve(ServerConfig { service: config }, port).await
            }
        }
    }
}

fn merge_options(config: &ServiceConfig, strict: bool) -> MergeOptions {
    let policy = if strict {
        MissingPartPolicy::Fail
    } else {
        config.on_missing_part
    };
    MergeOptions::with_policy(policy).with_deadline(config.request_deadline())
}

async fn run_csv(
    config: &ServiceConfig,
    manifest_uri: &str,
    output: Option<&Path>,
    strict: bool,
) -> Result<()> {
    let options = merge_options(config, strict);
    let manifest = load_manifest(manifest_uri, &options.deadline).await?;
    let body = CsvMerger::new(options).stream(manifest);
    write_stream(body, output).await
}

async fn run_json(
    config: &ServiceConfig,
    manifest_uri: &str,
    output: Option<&Path>,
    strict: bool,
    pretty: bool,
) -> Result<()> {
    let options = merge_options(config, strict);
    let manifest = load_manifest(manifest_uri, &options.deadline).await?;
    let writer = RecordArrayWriter::new(options);

    if pretty {
        // pretty output needs the whole array in hand
        let records = writer.collect(manifest).await?;
        let body = serde_json::to_vec_pretty(&records)
            .map_err(|e| Error::output(format!("Failed to serialize records: {e}")))?;
        write_all(&body, output).await
    } else {
        write_stream(writer.stream(manifest), output).await
    }
}

async fn run_inspect(config: &ServiceConfig, manifest_uri: &str) -> Result<()> {
    let manifest = load_manifest(manifest_uri, &config.request_deadline()).await?;

    println!("manifest:    {manifest_uri}");
    println!("format:      {}", manifest.format);
    println!(
        "compression: {}",
        manifest.compression.as_deref().unwrap_or("none")
    );
    if manifest.has_columns() {
        println!("columns:     {}", manifest.columns.join(", "));
    } else {
        println!("columns:     (undeclared; inferred from first part)");
    }
    if manifest.row_count >= 0 {
        println!("row_count:   {}", manifest.row_count);
    } else {
        println!("row_count:   unknown");
    }
    println!("chunks:      {}", manifest.chunks.len());
    for (i, chunk) in manifest.chunks.iter().enumerate() {
        let rows = if chunk.rows >= 0 {
            chunk.rows.to_string()
        } else {
            "?".to_string()
        };
        let bytes = if chunk.bytes >= 0 {
            chunk.bytes.to_string()
        } else {
            "?".to_string()
        };
        println!("  [{i}] {} (rows={rows}, bytes={bytes})", chunk.uri);
    }
    Ok(())
}

async fn write_stream(mut body: ByteStream, output: Option<&Path>) -> Result<()> {
    let mut sink = open_sink(output).await?;
    let mut written = 0u64;
    while let Some(frame) = body.next().await {
        let frame = frame?;
        sink.write_all(&frame).await?;
        written += frame.len() as u64;
    }
    sink.flush().await?;
    if let Some(path) = output {
        info!(bytes = written, path = %path.display(), "wrote output");
    }
    Ok(())
}

async fn write_all(body: &[u8], output: Option<&Path>) -> Result<()> {
    let mut sink = open_sink(output).await?;
    sink.write_all(body).await?;
    sink.flush().await?;
    Ok(())
}

async fn open_sink(output: Option<&Path>) -> Result<Box<dyn tokio::io::AsyncWrite + Unpin + Send>> {
    match output {
        Some(path) => {
            let file = tokio::fs::File::create(path).await.map_err(|e| {
                Error::output(format!("Failed to create {}: {e}", path.display()))
            })?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(tokio::io::stdout())),
    }
}
