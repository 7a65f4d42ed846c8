//! Common types used throughout resultify
//!
//! Shared type aliases, the request-scoped deadline, and the per-chunk
//! failure policy.

use std::pin::Pin;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::Result;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type; preserves insertion order of keys
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// A stream of output byte frames, one `Err` item at most (terminal)
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>;

// ============================================================================
// Missing-Part Policy
// ============================================================================

/// What to do when a partition file fails to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPartPolicy {
    /// Omit the part's rows and continue with the next part
    #[default]
    Skip,
    /// Abort the conversion
    Fail,
}

// ============================================================================
// Deadline
// ============================================================================

/// Request-scoped deadline applied to every storage operation.
///
/// One `Deadline` is created per download request and shared across the
/// manifest fetch and every chunk fetch, so slow parts consume the same
/// budget rather than each getting a fresh timeout.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    /// No deadline; operations may block indefinitely
    pub fn none() -> Self {
        Self { at: None }
    }

    /// Deadline `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        Self {
            at: Some(Instant::now() + timeout),
        }
    }

    /// Time left, or `None` when unbounded
    pub fn remaining(&self) -> Option<Duration> {
        self.at.map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Whether the deadline has passed
    pub fn is_expired(&self) -> bool {
        matches!(self.remaining(), Some(rem) if rem.is_zero())
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_none_never_expires() {
        let d = Deadline::none();
        assert!(d.remaining().is_none());
        assert!(!d.is_expired());
    }

    #[test]
    fn test_deadline_after() {
        let d = Deadline::after(Duration::from_secs(60));
        let rem = d.remaining().unwrap();
        assert!(rem <= Duration::from_secs(60));
        assert!(rem > Duration::from_secs(59));
        assert!(!d.is_expired());
    }

    #[test]
    fn test_deadline_expired() {
        let d = Deadline::after(Duration::ZERO);
        assert!(d.is_expired());
        assert_eq!(d.remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_missing_part_policy_serde() {
        let p: MissingPartPolicy = serde_json::from_str("\"fail\"").unwrap();
        assert_eq!(p, MissingPartPolicy::Fail);

        let json = serde_json::to_string(&MissingPartPolicy::Skip).unwrap();
        assert_eq!(json, "\"skip\"");

        assert_eq!(MissingPartPolicy::default(), MissingPartPolicy::Skip);
    }
}
