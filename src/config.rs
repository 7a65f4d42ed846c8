//! Service configuration
//!
//! Everything that used to be ambient (bucket conventions, filename prefix,
//! timeouts) lives in an explicit [`ServiceConfig`] value passed into the
//! components that need it. Loaded from a YAML file or defaulted.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Deadline, MissingPartPolicy};

/// Service-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Prefix for download attachment filenames, e.g. `job-<id>.csv`
    #[serde(default = "default_filename_prefix")]
    pub filename_prefix: String,

    /// Budget in seconds for one whole download request's storage I/O
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// What to do when a partition file fails to open
    #[serde(default)]
    pub on_missing_part: MissingPartPolicy,

    /// Port for HTTP server mode
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_filename_prefix() -> String {
    "job-".to_string()
}

fn default_request_timeout_secs() -> u64 {
    300
}

fn default_port() -> u16 {
    8080
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            filename_prefix: default_filename_prefix(),
            request_timeout_secs: default_request_timeout_secs(),
            on_missing_part: MissingPartPolicy::default(),
            port: default_port(),
        }
    }
}

impl ServiceConfig {
    /// Fresh request-scoped deadline from the configured timeout.
    ///
    /// A timeout of 0 means unbounded.
    pub fn request_deadline(&self) -> Deadline {
        if self.request_timeout_secs == 0 {
            Deadline::none()
        } else {
            Deadline::after(Duration::from_secs(self.request_timeout_secs))
        }
    }
}

/// Load configuration from a YAML file
pub fn load_config(path: impl AsRef<Path>) -> Result<ServiceConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::config(format!("Failed to read {}: {e}", path.display())))?;
    load_config_from_str(&raw)
}

/// Parse configuration from a YAML string
pub fn load_config_from_str(raw: &str) -> Result<ServiceConfig> {
    Ok(serde_yaml::from_str(raw)?)
}
