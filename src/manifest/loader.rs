//! Manifest fetching and parsing

use tracing::debug;

use crate::error::{Error, Result};
use crate::storage::{FetchError, ObjectLocation};
use crate::types::Deadline;

use super::Manifest;

/// UTF-8 byte-order mark, seen on manifests written through some tooling
const BOM: &[u8] = b"\xef\xbb\xbf";

/// Fetch and parse the manifest at `uri`.
///
/// A malformed URI or missing object is fatal for the whole request; there
/// is nothing to merge without a manifest.
pub async fn load_manifest(uri: &str, deadline: &Deadline) -> Result<Manifest> {
    let location = ObjectLocation::parse(uri)?;

    let body = location.fetch(deadline).await.map_err(|e| match e {
        FetchError::NotFound => Error::manifest_not_found(uri),
        other => other.into_error(uri),
    })?;

    let manifest = parse_manifest(&body)?;
    debug!(
        uri,
        columns = manifest.columns.len(),
        chunks = manifest.chunks.len(),
        row_count = manifest.row_count,
        "loaded result manifest"
    );
    Ok(manifest)
}

/// Parse raw manifest bytes, stripping a UTF-8 BOM if present.
pub fn parse_manifest(body: &[u8]) -> Result<Manifest> {
    let body = body.strip_prefix(BOM).unwrap_or(body);
    let text = std::str::from_utf8(body)
        .map_err(|e| Error::manifest_invalid(format!("manifest is not UTF-8: {e}")))?;
    let manifest: Manifest = serde_json::from_str(text)
        .map_err(|e| Error::manifest_invalid(format!("manifest is not valid JSON: {e}")))?;
    manifest.validate()?;
    Ok(manifest)
}
