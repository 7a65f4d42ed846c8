//! Error types for resultify
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Manifest-level variants are fatal for a request; `PartUnavailable` is the
//! only variant eligible for the skip policy.

use thiserror::Error;

/// The main error type for resultify
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Manifest Errors
    // ============================================================================
    #[error("Manifest not found: {uri}")]
    ManifestNotFound { uri: String },

    #[error("Invalid manifest: {message}")]
    ManifestInvalid { message: String },

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Bad storage location '{uri}': {message}")]
    BadLocationUri { uri: String, message: String },

    #[error("Storage error for {uri}: {message}")]
    Storage { uri: String, message: String },

    #[error("Deadline exceeded after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Part Errors
    // ============================================================================
    #[error("Part unavailable: {uri} ({message})")]
    PartUnavailable { uri: String, message: String },

    #[error("Read failed for part {uri}: {message}")]
    PartRead { uri: String, message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a manifest-not-found error
    pub fn manifest_not_found(uri: impl Into<String>) -> Self {
        Self::ManifestNotFound { uri: uri.into() }
    }

    /// Create an invalid-manifest error
    pub fn manifest_invalid(message: impl Into<String>) -> Self {
        Self::ManifestInvalid {
            message: message.into(),
        }
    }

    /// Create a bad-location error
    pub fn bad_location(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadLocationUri {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Storage {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Create a part-unavailable error
    pub fn part_unavailable(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PartUnavailable {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Create a part-read error
    pub fn part_read(uri: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PartRead {
            uri: uri.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Whether a per-chunk merge may drop this error and continue.
    ///
    /// Only a part that failed to *open* qualifies; anything that happens
    /// after a part is open (or anywhere else) aborts the conversion.
    pub fn is_skippable(&self) -> bool {
        matches!(self, Error::PartUnavailable { .. })
    }
}

/// Result type alias for resultify
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::manifest_not_found("gs://b/jobs/1/manifest.json");
        assert_eq!(
            err.to_string(),
            "Manifest not found: gs://b/jobs/1/manifest.json"
        );

        let err = Error::bad_location("ftp://nope", "unsupported scheme");
        assert_eq!(
            err.to_string(),
            "Bad storage location 'ftp://nope': unsupported scheme"
        );

        let err = Error::part_unavailable("gs://b/p1.csv.gz", "object does not exist");
        assert_eq!(
            err.to_string(),
            "Part unavailable: gs://b/p1.csv.gz (object does not exist)"
        );
    }

    #[test]
    fn test_is_skippable() {
        assert!(Error::part_unavailable("gs://b/p1", "missing").is_skippable());

        assert!(!Error::part_read("gs://b/p1", "truncated gzip").is_skippable());
        assert!(!Error::manifest_invalid("no chunks").is_skippable());
        assert!(!Error::Timeout { timeout_ms: 30_000 }.is_skippable());
        assert!(!Error::config("bad prefix").is_skippable());
    }
}
