//! JSON record-array output
//!
//! Every data record becomes an object keyed by canonical column name with
//! best-effort typed values, in column order and chunk order. Two
//! interchangeable realizations: a fully-buffered collection of typed
//! records, and an incremental `[...]` byte stream. Both process chunks one
//! at a time; only the buffered variant accumulates the typed records.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream;
use tokio::sync::mpsc;

use crate::decode;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::types::{ByteStream, JsonObject};

use super::reader::{ResultSetReader, RowEvent};
use super::MergeOptions;

/// Builds the record-array rendition of one result set
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordArrayWriter {
    options: MergeOptions,
}

impl RecordArrayWriter {
    /// Writer with the given per-request options
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    /// Collect every record as a typed object, in order.
    pub async fn collect(&self, manifest: Manifest) -> Result<Vec<JsonObject>> {
        let mut records = Vec::with_capacity(manifest.estimated_rows().unwrap_or(0));
        let mut reader = ResultSetReader::new(manifest, self.options);
        let mut header: Option<Arc<Vec<String>>> = None;

        loop {
            match reader.next_event().await? {
                RowEvent::Header(columns) => header = Some(columns),
                RowEvent::Row { line, .. } => {
                    let Some(columns) = header.as_ref() else {
                        // rows are only ever emitted after a header
                        continue;
                    };
                    records.push(build_record(columns, &line));
                }
                RowEvent::ChunkSkipped { .. } => {}
                RowEvent::Done => break,
            }
        }
        Ok(records)
    }

    /// The full record array serialized as one JSON document.
    pub async fn to_json_bytes(&self, manifest: Manifest) -> Result<Bytes> {
        let records = self.collect(manifest).await?;
        let body = serde_json::to_vec(&records)
            .map_err(|e| Error::output(format!("Failed to serialize records: {e}")))?;
        Ok(Bytes::from(body))
    }

    /// Stream the record array as JSON bytes, one frame per chunk.
    ///
    /// Emits `[`, the comma-separated records, then `]`. An empty result is
    /// the two-byte document `[]`. Failure semantics match
    /// [`CsvMerger::stream`](super::CsvMerger::stream): the error arrives as
    /// the final stream item.
    pub fn stream(&self, manifest: Manifest) -> ByteStream {
        let options = self.options;
        let (tx, rx) = mpsc::channel::<Result<Bytes>>(2);

        tokio::spawn(async move {
            let mut reader = ResultSetReader::new(manifest, options);
            let mut header: Option<Arc<Vec<String>>> = None;
            let mut frame: Vec<u8> = vec![b'['];
            let mut frame_chunk: Option<usize> = None;
            let mut first_record = true;

            loop {
                match reader.next_event().await {
                    Ok(RowEvent::Header(columns)) => header = Some(columns),
                    Ok(RowEvent::Row { chunk, line }) => {
                        let Some(columns) = header.as_ref() else {
                            continue;
                        };
                        if frame_chunk.is_some_and(|c| c != chunk) && !frame.is_empty() {
                            let full = std::mem::take(&mut frame);
                            if tx.send(Ok(Bytes::from(full))).await.is_err() {
                                return;
                            }
                        }
                        frame_chunk = Some(chunk);

                        if !first_record {
                            frame.push(b',');
                        }
                        first_record = false;
                        match serde_json::to_vec(&build_record(columns, &line)) {
                            Ok(body) => frame.extend_from_slice(&body),
                            Err(e) => {
                                let _ = tx
                                    .send(Err(Error::output(format!(
                                        "Failed to serialize record: {e}"
                                    ))))
                                    .await;
                                return;
                            }
                        }
                    }
                    Ok(RowEvent::ChunkSkipped { .. }) => {}
                    Ok(RowEvent::Done) => {
                        frame.push(b']');
                        let _ = tx.send(Ok(Bytes::from(frame))).await;
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

/// One typed record from a raw data line.
///
/// Cells map to columns by position; a row shorter than the header reads as
/// empty strings for the missing tail, and cells beyond the header are
/// dropped. Empty-string cells coerce to empty strings, not null.
fn build_record(columns: &[String], line: &str) -> JsonObject {
    let cells = decode::parse_line(line);
    let mut record = JsonObject::new();
    for (i, column) in columns.iter().enumerate() {
        let raw = cells.get(i).map_or("", String::as_str);
        record.insert(column.clone(), decode::coerce(raw));
    }
    record
}
