//! Sequential walk over the chunks of one result set
//!
//! Pull-based: callers loop on [`ResultSetReader::next_event`] until
//! [`RowEvent::Done`]. Chunks are visited strictly in manifest order, one
//! at a time; the in-progress chunk's stream is dropped on every exit path
//! because the reader owns it.

use std::sync::Arc;

use tracing::warn;

use crate::decode;
use crate::error::{Error, Result};
use crate::manifest::Manifest;
use crate::part::{open_part, Compression, PartLines};
use crate::types::MissingPartPolicy;

use super::header::{FirstLine, HeaderReconciler};
use super::MergeOptions;

/// One step of the walk
#[derive(Debug)]
pub enum RowEvent {
    /// Canonical header established; emitted exactly once, before any row
    Header(Arc<Vec<String>>),
    /// One data record, with its raw line content and source chunk index
    Row { chunk: usize, line: String },
    /// A chunk failed to open and was dropped under the skip policy
    ChunkSkipped { chunk: usize, uri: String },
    /// All chunks exhausted
    Done,
}

/// Drives one manifest's chunks through parsing and header reconciliation
pub struct ResultSetReader {
    manifest: Manifest,
    options: MergeOptions,
    reconciler: HeaderReconciler,
    header_emitted: bool,
    next_chunk: usize,
    current: Option<OpenChunk>,
}

struct OpenChunk {
    index: usize,
    lines: PartLines,
    past_first_line: bool,
}

impl ResultSetReader {
    /// Reader over a loaded manifest. Columns declared in the manifest are
    /// authoritative; otherwise the header is inferred from the first chunk
    /// that opens.
    pub fn new(manifest: Manifest, options: MergeOptions) -> Self {
        let reconciler = HeaderReconciler::with_columns(manifest.columns.clone());
        Self {
            manifest,
            options,
            reconciler,
            header_emitted: false,
            next_chunk: 0,
            current: None,
        }
    }

    /// The manifest being walked
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Advance the walk one step.
    ///
    /// Errors are terminal: a part that fails to open under the `Fail`
    /// policy, any mid-read failure, or deadline expiry. After an error or
    /// `Done` the reader must not be polled again.
    pub async fn next_event(&mut self) -> Result<RowEvent> {
        if let Some(event) = self.pending_header() {
            return Ok(event);
        }

        loop {
            if self.current.is_none() {
                match self.open_next_chunk().await? {
                    NextChunk::Opened => {}
                    NextChunk::Skipped { chunk, uri } => {
                        return Ok(RowEvent::ChunkSkipped { chunk, uri });
                    }
                    NextChunk::Exhausted => return Ok(RowEvent::Done),
                }
            }
            let Some(open) = self.current.as_mut() else {
                continue;
            };

            let Some(line) = open.lines.next_line()? else {
                self.current = None;
                continue;
            };

            if !open.past_first_line {
                open.past_first_line = true;
                let cells = decode::parse_line(&line);
                let chunk = open.index;
                match self.reconciler.reconcile_first(&cells) {
                    FirstLine::Header => {
                        if let Some(event) = self.pending_header() {
                            return Ok(event);
                        }
                        // restated header, drop it
                        continue;
                    }
                    FirstLine::Data => return Ok(RowEvent::Row { chunk, line }),
                }
            }

            return Ok(RowEvent::Row {
                chunk: open.index,
                line,
            });
        }
    }

    /// Header event if one is due and not yet delivered
    fn pending_header(&mut self) -> Option<RowEvent> {
        if self.header_emitted {
            return None;
        }
        let header = self.reconciler.header()?.clone();
        self.header_emitted = true;
        Some(RowEvent::Header(header))
    }

    async fn open_next_chunk(&mut self) -> Result<NextChunk> {
        let Some(chunk) = self.manifest.chunks.get(self.next_chunk) else {
            return Ok(NextChunk::Exhausted);
        };
        let index = self.next_chunk;
        self.next_chunk += 1;

        let uri = chunk.uri.clone();
        let compression = Compression::detect(self.manifest.compression.as_deref(), &uri);

        match open_part(&uri, compression, &self.options.deadline).await {
            Ok(lines) => {
                self.current = Some(OpenChunk {
                    index,
                    lines,
                    past_first_line: false,
                });
                Ok(NextChunk::Opened)
            }
            Err(e) if e.is_skippable() && self.options.missing_part == MissingPartPolicy::Skip => {
                warn!(chunk = index, uri, error = %e, "skipping unavailable part");
                Ok(NextChunk::Skipped { chunk: index, uri })
            }
            Err(e) => Err(e),
        }
    }
}

enum NextChunk {
    Opened,
    Skipped { chunk: usize, uri: String },
    Exhausted,
}
