//! Tests for the part module

use std::io::{Cursor, Write};

use flate2::write::GzEncoder;
use flate2::Compression as GzLevel;
use test_case::test_case;

use super::*;
use crate::error::Error;
use crate::types::Deadline;

fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), GzLevel::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn lines_from(uri: &str, data: &'static [u8]) -> PartLines {
    PartLines::new(uri, Box::new(Cursor::new(data)))
}

fn drain(mut lines: PartLines) -> Vec<String> {
    let mut out = Vec::new();
    while let Some(line) = lines.next_line().unwrap() {
        out.push(line);
    }
    out
}

// ============================================================================
// Compression detection
// ============================================================================

#[test_case(Some("gzip"), "gs://b/part.csv" => Compression::Gzip; "hint wins")]
#[test_case(Some("GZIP"), "gs://b/part.csv" => Compression::Gzip; "hint is case-insensitive")]
#[test_case(Some("none"), "gs://b/part.csv.gz" => Compression::None; "explicit other hint wins over suffix")]
#[test_case(None, "gs://b/part.csv.gz" => Compression::Gzip; "gz suffix")]
#[test_case(None, "gs://b/part.csv" => Compression::None; "no hint no suffix")]
fn test_detect(hint: Option<&str>, uri: &str) -> Compression {
    Compression::detect(hint, uri)
}

// ============================================================================
// Line iteration
// ============================================================================

#[test]
fn test_lines_strip_newlines() {
    let lines = lines_from("p", b"a,b\n1,2\n3,4\n");
    assert_eq!(drain(lines), vec!["a,b", "1,2", "3,4"]);
}

#[test]
fn test_lines_strip_crlf() {
    let lines = lines_from("p", b"a,b\r\n1,2\r\n");
    assert_eq!(drain(lines), vec!["a,b", "1,2"]);
}

#[test]
fn test_lines_drop_empty() {
    let lines = lines_from("p", b"a,b\n\n\n1,2\n\r\n3,4");
    assert_eq!(drain(lines), vec!["a,b", "1,2", "3,4"]);
}

#[test]
fn test_lines_without_trailing_newline() {
    let lines = lines_from("p", b"a,b\n1,2");
    assert_eq!(drain(lines), vec!["a,b", "1,2"]);
}

#[test]
fn test_empty_part() {
    let mut lines = lines_from("p", b"");
    assert!(lines.next_line().unwrap().is_none());
}

#[test]
fn test_truncated_gzip_is_read_error() {
    let mut compressed = gzip(b"a,b\n1,2\n3,4\n5,6\n7,8\n");
    compressed.truncate(compressed.len() / 2);

    let body = bytes::Bytes::from(compressed);
    let mut lines = PartLines::new(
        "gs://b/part.csv.gz",
        Box::new(std::io::BufReader::new(flate2::read::GzDecoder::new(
            Cursor::new(body),
        ))),
    );

    let mut result = Ok(Some(String::new()));
    while let Ok(Some(_)) = result {
        result = lines.next_line();
    }
    assert!(matches!(result, Err(Error::PartRead { .. })));
}

#[test]
fn test_invalid_utf8_is_read_error() {
    let mut lines = lines_from("p", b"\xff\xfe bad bytes\n");
    assert!(matches!(lines.next_line(), Err(Error::PartRead { .. })));
}

// ============================================================================
// open_part
// ============================================================================

#[tokio::test]
async fn test_open_gzip_part_from_local_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("part-00000.csv.gz");
    std::fs::write(&path, gzip(b"a,b\n1,2\n")).unwrap();

    let uri = path.to_str().unwrap().to_string();
    let lines = open_part(&uri, Compression::Gzip, &Deadline::none())
        .await
        .unwrap();
    assert_eq!(drain(lines), vec!["a,b", "1,2"]);
}

#[tokio::test]
async fn test_open_plain_part_from_local_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("part-00000.csv");
    std::fs::write(&path, b"x,y\nfoo,bar\n").unwrap();

    let uri = path.to_str().unwrap().to_string();
    let lines = open_part(&uri, Compression::None, &Deadline::none())
        .await
        .unwrap();
    assert_eq!(drain(lines), vec!["x,y", "foo,bar"]);
}

#[tokio::test]
async fn test_open_missing_part_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let uri = format!("{}/absent.csv.gz", dir.path().display());
    let err = open_part(&uri, Compression::Gzip, &Deadline::none())
        .await
        .unwrap_err();
    assert!(err.is_skippable());
    assert!(matches!(err, Error::PartUnavailable { .. }));
}

#[tokio::test]
async fn test_open_bad_uri_degrades_to_unavailable() {
    let err = open_part("ftp://nope/p1.csv.gz", Compression::Gzip, &Deadline::none())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::PartUnavailable { .. }));
}

#[tokio::test]
async fn test_open_expired_deadline_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("part.csv");
    std::fs::write(&path, b"a\n").unwrap();

    let uri = path.to_str().unwrap().to_string();
    let err = open_part(&uri, Compression::None, &Deadline::after(std::time::Duration::ZERO))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Timeout { .. }));
    assert!(!err.is_skippable());
}
