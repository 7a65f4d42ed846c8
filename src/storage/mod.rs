//! Object storage access (S3, R2, GCS, Azure, local)
//!
//! Resolves `scheme://bucket/path` URIs to an [`ObjectStore`] client plus an
//! object path, and fetches object bytes under a request-scoped deadline.
//! Credentials come from the environment, per store.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;

use crate::error::{Error, Result};
use crate::types::Deadline;

/// Why a fetch failed, before the caller decides how fatal that is.
///
/// The manifest loader maps `NotFound` to `ManifestNotFound`; the part
/// reader maps it to `PartUnavailable`.
#[derive(Debug)]
pub enum FetchError {
    /// The object does not exist
    NotFound,
    /// The request-scoped deadline expired
    Timeout { timeout_ms: u64 },
    /// Transport or store failure
    Other(String),
}

impl FetchError {
    /// Convert into the crate error, attributing the failure to `uri`.
    pub fn into_error(self, uri: &str) -> Error {
        match self {
            FetchError::NotFound => Error::storage(uri, "object does not exist"),
            FetchError::Timeout { timeout_ms } => Error::Timeout { timeout_ms },
            FetchError::Other(message) => Error::storage(uri, message),
        }
    }
}

/// One addressable object in storage
#[derive(Debug, Clone)]
pub struct ObjectLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Path of the object within the bucket/container
    path: ObjectPath,
    /// URL scheme for logging (s3, r2, gs, az, file)
    scheme: String,
    /// The original URI
    uri: String,
}

impl ObjectLocation {
    /// Parse an object URI and create the appropriate store client.
    ///
    /// Supported formats:
    /// - `s3://bucket/key` - AWS S3
    /// - `r2://bucket/key` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/key` - Google Cloud Storage
    /// - `az://container/key` - Azure Blob Storage
    /// - `file:///abs/path` or `/abs/path` - Local filesystem
    pub fn parse(uri: &str) -> Result<Self> {
        if let Some(rest) = uri.strip_prefix("s3://") {
            Self::build_s3(uri, rest, false)
        } else if let Some(rest) = uri.strip_prefix("r2://") {
            Self::build_s3(uri, rest, true)
        } else if let Some(rest) = uri.strip_prefix("gs://") {
            Self::build_gcs(uri, rest)
        } else if let Some(rest) = uri.strip_prefix("az://") {
            Self::build_azure(uri, rest)
        } else if uri.starts_with("file://") || uri.starts_with('/') {
            Self::build_local(uri)
        } else {
            Err(Error::bad_location(
                uri,
                "expected scheme://bucket/path (s3, r2, gs, az) or a local path",
            ))
        }
    }

    /// Split `bucket/object` with both halves required non-empty.
    fn split_bucket<'a>(uri: &str, rest: &'a str) -> Result<(&'a str, &'a str)> {
        let Some(idx) = rest.find('/') else {
            return Err(Error::bad_location(uri, "missing object path after bucket"));
        };
        let (bucket, object) = (&rest[..idx], &rest[idx + 1..]);
        if bucket.is_empty() || object.is_empty() {
            return Err(Error::bad_location(uri, "empty bucket or object path"));
        }
        Ok((bucket, object))
    }

    fn build_s3(uri: &str, rest: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let (bucket, object) = Self::split_bucket(uri, rest)?;

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if is_r2 {
            // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }
        let store = builder
            .build()
            .map_err(|e| Error::bad_location(uri, format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            path: ObjectPath::from(object),
            scheme: scheme.to_string(),
            uri: uri.to_string(),
        })
    }

    fn build_gcs(uri: &str, rest: &str) -> Result<Self> {
        let (bucket, object) = Self::split_bucket(uri, rest)?;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::bad_location(uri, format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            path: ObjectPath::from(object),
            scheme: "gs".to_string(),
            uri: uri.to_string(),
        })
    }

    fn build_azure(uri: &str, rest: &str) -> Result<Self> {
        let (container, object) = Self::split_bucket(uri, rest)?;

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::bad_location(uri, format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            path: ObjectPath::from(object),
            scheme: "az".to_string(),
            uri: uri.to_string(),
        })
    }

    fn build_local(uri: &str) -> Result<Self> {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        let object_path = ObjectPath::from_absolute_path(path)
            .map_err(|e| Error::bad_location(uri, e.to_string()))?;

        Ok(Self {
            store: Arc::new(LocalFileSystem::new()),
            path: object_path,
            scheme: "file".to_string(),
            uri: uri.to_string(),
        })
    }

    /// The original URI this location was parsed from
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The URL scheme (s3, r2, gs, az, file)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Fetch the full object body, bounded by `deadline`.
    pub async fn fetch(&self, deadline: &Deadline) -> std::result::Result<Bytes, FetchError> {
        let result = with_deadline(deadline, self.store.get(&self.path)).await?;
        let get = result.map_err(classify)?;
        let body = with_deadline(deadline, get.bytes()).await?;
        body.map_err(classify)
    }
}

fn classify(e: object_store::Error) -> FetchError {
    match e {
        object_store::Error::NotFound { .. } => FetchError::NotFound,
        other => FetchError::Other(other.to_string()),
    }
}

/// Run `fut` within whatever budget the deadline has left.
async fn with_deadline<T, F>(deadline: &Deadline, fut: F) -> std::result::Result<T, FetchError>
where
    F: Future<Output = T>,
{
    match deadline.remaining() {
        None => Ok(fut.await),
        Some(rem) if rem.is_zero() => Err(FetchError::Timeout { timeout_ms: 0 }),
        Some(rem) => tokio::time::timeout(rem, fut).await.map_err(|_| FetchError::Timeout {
            timeout_ms: rem.as_millis() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_path() {
        let loc = ObjectLocation::parse("/tmp/results/part-00000.csv.gz").unwrap();
        assert_eq!(loc.scheme(), "file");
        assert_eq!(loc.uri(), "/tmp/results/part-00000.csv.gz");
    }

    #[test]
    fn test_parse_file_uri() {
        let loc = ObjectLocation::parse("file:///tmp/results/manifest.json").unwrap();
        assert_eq!(loc.scheme(), "file");
    }

    #[test]
    fn test_parse_missing_object_path() {
        let err = ObjectLocation::parse("gs://bucket-only").unwrap_err();
        assert!(matches!(err, Error::BadLocationUri { .. }));

        let err = ObjectLocation::parse("gs:///no-bucket").unwrap_err();
        assert!(matches!(err, Error::BadLocationUri { .. }));
    }

    #[test]
    fn test_parse_unknown_scheme() {
        let err = ObjectLocation::parse("ftp://host/file.csv").unwrap_err();
        assert!(matches!(err, Error::BadLocationUri { .. }));

        let err = ObjectLocation::parse("not-a-uri").unwrap_err();
        assert!(matches!(err, Error::BadLocationUri { .. }));
    }

    #[tokio::test]
    async fn test_fetch_local_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let uri = format!("{}/absent.json", dir.path().display());
        let loc = ObjectLocation::parse(&uri).unwrap();
        let err = loc.fetch(&Deadline::none()).await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound));
    }

    #[tokio::test]
    async fn test_fetch_local_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hello.txt");
        std::fs::write(&file, b"hello").unwrap();

        let loc = ObjectLocation::parse(file.to_str().unwrap()).unwrap();
        let body = loc.fetch(&Deadline::none()).await.unwrap();
        assert_eq!(&body[..], b"hello");
    }

    #[tokio::test]
    async fn test_fetch_expired_deadline() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hello.txt");
        std::fs::write(&file, b"hello").unwrap();

        let loc = ObjectLocation::parse(file.to_str().unwrap()).unwrap();
        let err = loc
            .fetch(&Deadline::after(std::time::Duration::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Timeout { .. }));
    }
}
