//! Fetch, decompress, and iterate one partition file
//!
//! The compressed body is fetched whole, but decompression and line
//! splitting are streaming, so memory peaks at the compressed size plus the
//! decoder's working buffers rather than the decompressed content.

use std::io::{BufRead, BufReader, Cursor};

use bytes::Bytes;
use flate2::read::GzDecoder;

use crate::error::{Error, Result};
use crate::storage::ObjectLocation;
use crate::types::Deadline;

/// Compression applied to a partition file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Gzip-compressed body
    Gzip,
    /// Plain text
    #[default]
    None,
}

impl Compression {
    /// Decide from the manifest's hint, falling back to the URI suffix.
    pub fn detect(hint: Option<&str>, uri: &str) -> Self {
        match hint {
            Some(h) if h.eq_ignore_ascii_case("gzip") => Compression::Gzip,
            Some(_) => Compression::None,
            None if uri.ends_with(".gz") => Compression::Gzip,
            None => Compression::None,
        }
    }
}

/// Lazy, forward-only line sequence over one opened partition file.
///
/// Line boundary is `\n` with an optional trailing `\r` stripped; empty
/// lines are dropped. Not restartable.
pub struct PartLines {
    uri: String,
    reader: Box<dyn BufRead + Send>,
}

impl std::fmt::Debug for PartLines {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartLines")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

impl PartLines {
    pub(crate) fn new(uri: impl Into<String>, reader: Box<dyn BufRead + Send>) -> Self {
        Self {
            uri: uri.into(),
            reader,
        }
    }

    /// The URI this sequence was opened from
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Next non-empty line, or `None` at end of part.
    ///
    /// An I/O failure here (truncated gzip stream, invalid UTF-8) means the
    /// part was opened but could not be read through; that is a
    /// [`Error::PartRead`], not a skippable open failure.
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let mut buf = String::new();
        loop {
            buf.clear();
            let n = self
                .reader
                .read_line(&mut buf)
                .map_err(|e| Error::part_read(&self.uri, e.to_string()))?;
            if n == 0 {
                return Ok(None);
            }
            if buf.ends_with('\n') {
                buf.pop();
                if buf.ends_with('\r') {
                    buf.pop();
                }
            }
            if !buf.is_empty() {
                return Ok(Some(std::mem::take(&mut buf)));
            }
        }
    }
}

/// Open one partition file and return its line sequence.
///
/// Every failure up to and including the body fetch is reported as
/// [`Error::PartUnavailable`] with the offending URI attached, including a
/// chunk URI that does not parse. Whether that ends the request is the merge
/// policy's call, not this function's. Deadline expiry is the exception: it
/// aborts regardless of policy.
pub async fn open_part(uri: &str, compression: Compression, deadline: &Deadline) -> Result<PartLines> {
    let location = match ObjectLocation::parse(uri) {
        Ok(loc) => loc,
        Err(e) => return Err(Error::part_unavailable(uri, e.to_string())),
    };

    let body = location.fetch(deadline).await.map_err(|e| match e {
        crate::storage::FetchError::Timeout { timeout_ms } => Error::Timeout { timeout_ms },
        crate::storage::FetchError::NotFound => {
            Error::part_unavailable(uri, "object does not exist")
        }
        crate::storage::FetchError::Other(message) => Error::part_unavailable(uri, message),
    })?;

    Ok(PartLines::new(uri, decompressed_reader(body, compression)))
}

fn decompressed_reader(body: Bytes, compression: Compression) -> Box<dyn BufRead + Send> {
    match compression {
        Compression::Gzip => Box::new(BufReader::new(GzDecoder::new(Cursor::new(body)))),
        Compression::None => Box::new(Cursor::new(body)),
    }
}
