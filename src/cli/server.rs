//! HTTP server mode exposing result downloads
//!
//! The thin request-handling layer over the conversion core: one endpoint
//! per output format, each taking the manifest URI as a query parameter and
//! streaming the response body. Fatal manifest errors surface as structured
//! JSON with a per-variant status code before any output bytes; per-part
//! skips only show up in the logs.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::manifest::load_manifest;
use crate::merge::{CsvMerger, MergeOptions, RecordArrayWriter};
use crate::types::ByteStream;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Service-wide settings (filename prefix, timeout, skip policy)
    pub service: ServiceConfig,
}

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    config: ServerConfig,
}

/// Query parameters for the download endpoints
#[derive(Debug, Deserialize)]
struct DownloadParams {
    /// Manifest location, e.g. `gs://bucket/jobs/<id>/manifest.json`
    manifest: String,
}

/// Error payload wrapper
#[derive(Debug, Serialize)]
struct ApiError {
    success: bool,
    error: String,
}

impl ApiError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Start the HTTP server
pub async fn serve(config: ServerConfig, port: u16) -> Result<()> {
    let state = AppState { config };

    // allow all origins; this service sits behind the API gateway
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/download.csv", get(download_csv))
        .route("/download.json", get(download_json))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Stream the merged CSV document
async fn download_csv(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let config = &state.config.service;
    let options =
        MergeOptions::with_policy(config.on_missing_part).with_deadline(config.request_deadline());

    let manifest = match load_manifest(&params.manifest, &options.deadline).await {
        Ok(m) => m,
        Err(e) => return error_response(&params.manifest, &e),
    };

    let body = CsvMerger::new(options).stream(manifest);
    let filename = download_filename(&config.filename_prefix, &params.manifest, "csv");
    streaming_response(body, "text/csv; charset=utf-8", &filename)
}

/// Stream the JSON record array
async fn download_json(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let config = &state.config.service;
    let options =
        MergeOptions::with_policy(config.on_missing_part).with_deadline(config.request_deadline());

    let manifest = match load_manifest(&params.manifest, &options.deadline).await {
        Ok(m) => m,
        Err(e) => return error_response(&params.manifest, &e),
    };

    let body = RecordArrayWriter::new(options).stream(manifest);
    let filename = download_filename(&config.filename_prefix, &params.manifest, "json");
    streaming_response(body, "application/json; charset=utf-8", &filename)
}

fn streaming_response(body: ByteStream, content_type: &str, filename: &str) -> Response {
    let built = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from_stream(body));

    match built {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "failed to build streaming response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("failed to build response")),
            )
                .into_response()
        }
    }
}

fn error_response(manifest_uri: &str, error: &Error) -> Response {
    let status = status_for(error);
    warn!(manifest = manifest_uri, %status, error = %error, "download rejected");
    (status, Json(ApiError::new(error.to_string()))).into_response()
}

/// Map a conversion error to the client-visible status.
///
/// A missing manifest means the job's results are not (yet) there: a
/// not-found, distinguishable from a successful empty result.
fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::ManifestNotFound { .. } => StatusCode::NOT_FOUND,
        Error::BadLocationUri { .. } => StatusCode::BAD_REQUEST,
        Error::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Attachment filename: configured prefix plus the manifest's parent path
/// segment (`.../jobs/<id>/manifest.json` → `<id>`).
fn download_filename(prefix: &str, manifest_uri: &str, extension: &str) -> String {
    // drop scheme and bucket; only the object path names the job
    let object_path = manifest_uri
        .split_once("://")
        .map_or(manifest_uri, |(_, rest)| {
            rest.split_once('/').map_or("", |(_, object)| object)
        });
    let parent = object_path
        .trim_end_matches('/')
        .rsplit('/')
        .nth(1)
        .filter(|s| !s.is_empty())
        .unwrap_or("result");
    format!("{prefix}{parent}.{extension}")
}
