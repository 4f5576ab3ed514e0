//! Error types for template reconciliation.
//!
//! Errors are descriptive at the core level; the CLI layer maps them
//! to exit codes and user-facing hints.

use thiserror::Error;

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Core error type for reconciliation operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote template list could not be fetched
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// The compliance rewriter failed to produce content
    #[error("Compliance rewrite failed: {0}")]
    ComplianceRewriteFailed(String),

    /// The remote store refused a create, edit or delete
    #[error("Remote rejected: {0}")]
    RemoteRejected(String),

    /// Example values do not line up with the placeholders in the content
    #[error("Example count mismatch: content has {expected} placeholders, got {found} examples")]
    ExampleCountMismatch { expected: usize, found: usize },

    /// An auto-heal pass is already in flight
    #[error("An auto-heal pass is already running")]
    AlreadyRunning,

    /// Persistence backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Malformed persisted or remote data
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Template not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl SyncError {
    /// Whether this error came from the remote side (network or provider refusal).
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            SyncError::RemoteUnavailable(_) | SyncError::RemoteRejected(_)
        )
    }
}

impl From<std::io::Error> for SyncError {
    fn from(err: std::io::Error) -> Self {
        SyncError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::RemoteUnavailable(err.to_string())
    }
}
