//! Tests for the manifest module

use pretty_assertions::assert_eq;

use super::*;
use crate::error::Error;

const FULL: &str = r#"{
    "columns": ["id", "name", "score"],
    "row_count": 12345,
    "format": "csv",
    "compression": "gzip",
    "chunks": [
        {"uri": "gs://results/jobs/j1/part-00000.csv.gz", "rows": 10000, "bytes": 52431},
        {"uri": "gs://results/jobs/j1/part-00001.csv.gz", "rows": 2345, "bytes": 13311}
    ]
}"#;

#[test]
fn test_parse_full_manifest() {
    let m = parse_manifest(FULL.as_bytes()).unwrap();
    assert_eq!(m.columns, vec!["id", "name", "score"]);
    assert_eq!(m.row_count, 12345);
    assert_eq!(m.format, "csv");
    assert_eq!(m.compression.as_deref(), Some("gzip"));
    assert_eq!(m.chunks.len(), 2);
    assert_eq!(m.chunks[0].uri, "gs://results/jobs/j1/part-00000.csv.gz");
    assert_eq!(m.chunks[1].rows, 2345);
    assert!(m.has_columns());
    assert_eq!(m.estimated_rows(), Some(12345));
}

#[test]
fn test_parse_minimal_manifest() {
    // only chunks are required; everything else defaults
    let m = parse_manifest(br#"{"chunks": [{"uri": "gs://b/p1.csv"}]}"#).unwrap();
    assert!(m.columns.is_empty());
    assert!(!m.has_columns());
    assert_eq!(m.row_count, -1);
    assert_eq!(m.estimated_rows(), None);
    assert_eq!(m.format, "csv");
    assert!(m.compression.is_none());
    assert_eq!(m.chunks[0].rows, -1);
    assert_eq!(m.chunks[0].bytes, -1);
}

#[test]
fn test_parse_strips_bom() {
    let mut body = b"\xef\xbb\xbf".to_vec();
    body.extend_from_slice(br#"{"chunks": [{"uri": "gs://b/p1.csv"}]}"#);
    let m = parse_manifest(&body).unwrap();
    assert_eq!(m.chunks.len(), 1);
}

#[test]
fn test_empty_chunks_is_invalid() {
    let err = parse_manifest(br#"{"columns": ["a"], "chunks": []}"#).unwrap_err();
    assert!(matches!(err, Error::ManifestInvalid { .. }));

    // absent chunks defaults to empty, which is equally invalid
    let err = parse_manifest(br#"{"columns": ["a"]}"#).unwrap_err();
    assert!(matches!(err, Error::ManifestInvalid { .. }));
}

#[test]
fn test_garbage_is_invalid() {
    let err = parse_manifest(b"not json at all").unwrap_err();
    assert!(matches!(err, Error::ManifestInvalid { .. }));

    let err = parse_manifest(&[0xff, 0xfe, 0x00]).unwrap_err();
    assert!(matches!(err, Error::ManifestInvalid { .. }));
}

#[test]
fn test_unknown_fields_tolerated() {
    // the worker also writes a "meta" block; readers ignore it
    let m = parse_manifest(
        br#"{"chunks": [{"uri": "gs://b/p1.csv.gz"}], "meta": {"title": "Yearly means"}}"#,
    )
    .unwrap();
    assert_eq!(m.chunks.len(), 1);
}

#[tokio::test]
async fn test_load_manifest_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let uri = format!("{}/manifest.json", dir.path().display());
    let err = load_manifest(&uri, &crate::types::Deadline::none())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::ManifestNotFound { .. }));
}

#[tokio::test]
async fn test_load_manifest_bad_uri_is_fatal() {
    let err = load_manifest("ftp://nope/manifest.json", &crate::types::Deadline::none())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::BadLocationUri { .. }));
}
