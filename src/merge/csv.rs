//! Merged CSV output
//!
//! One escaped header line, then every data record's raw line verbatim, in
//! chunk order. The streaming variant flushes at chunk boundaries so memory
//! stays bounded by one chunk's decompressed content; the buffered variant
//! exists for callers that want the whole document at once.

use bytes::Bytes;
use futures::stream;
use tokio::sync::mpsc;

use crate::decode;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::types::ByteStream;

use super::reader::{ResultSetReader, RowEvent};
use super::MergeOptions;

/// Builds the merged CSV document for one result set
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvMerger {
    options: MergeOptions,
}

impl CsvMerger {
    /// Merger with the given per-request options
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Merge all parts into one in-memory document.
    pub async fn merge(&self, manifest: Manifest) -> Result<Bytes> {
        let mut reader = ResultSetReader::new(manifest, self.options);
        let mut out: Vec<u8> = Vec::new();
        loop {
            match reader.next_event().await? {
                RowEvent::Header(columns) => write_header(&mut out, &columns),
                RowEvent::Row { line, .. } => write_row(&mut out, &line),
                RowEvent::ChunkSkipped { .. } => {}
                RowEvent::Done => break,
            }
        }
        Ok(Bytes::from(out))
    }

    /// Merge all parts into a byte stream, one frame per chunk.
    ///
    /// The walk runs in a spawned task; dropping the stream (client
    /// disconnect) makes the next send fail, which stops the walk and
    /// releases the open part. A failure mid-walk arrives as the stream's
    /// final `Err` item; bytes already emitted stay emitted.
    pub fn stream(&self, manifest: Manifest) -> ByteStream {
        let options = self.options;
        let (tx, rx) = mpsc::channel::<Result<Bytes>>(2);

        tokio::spawn(async move {
            let mut reader = ResultSetReader::new(manifest, options);
            let mut frame: Vec<u8> = Vec::new();
            let mut frame_chunk: Option<usize> = None;

            loop {
                match reader.next_event().await {
                    Ok(RowEvent::Header(columns)) => write_header(&mut frame, &columns),
                    Ok(RowEvent::Row { chunk, line }) => {
                        if frame_chunk.is_some_and(|c| c != chunk) && !frame.is_empty() {
                            let full = std::mem::take(&mut frame);
                            if tx.send(Ok(Bytes::from(full))).await.is_err() {
                                return;
                            }
                        }
                        frame_chunk = Some(chunk);
                        write_row(&mut frame, &line);
                    }
                    Ok(RowEvent::ChunkSkipped { .. }) => {}
                    Ok(RowEvent::Done) => {
                        if !frame.is_empty() {
                            let _ = tx.send(Ok(Bytes::from(frame))).await;
                        }
                        return;
                    }
                    Err(e) => {
                        if !frame.is_empty() {
                            let full = std::mem::take(&mut frame);
                            if tx.send(Ok(Bytes::from(full))).await.is_err() {
                                return;
                            }
                        }
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                }
            }
        });

        Box::pin(stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        }))
    }
}

fn write_header(out: &mut Vec<u8>, columns: &[String]) {
    out.extend_from_slice(decode::join_row(columns).as_bytes());
    out.push(b'\n');
}

fn write_row(out: &mut Vec<u8>, line: &str) {
    out.extend_from_slice(line.as_bytes());
    out.push(b'\n');
}
