use std::fmt;

// === BackendError ===

/// Errors surfaced by the backend collaborator.
///
/// The store core downgrades most of these to safe defaults (empty score
/// list, synthesized rank config, unset enrichment); rank-persistence
/// failures are returned to the presentation layer to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The backend could not be reached or the call failed outright.
    Unavailable(String),
    /// The named link does not exist (possibly deleted concurrently).
    NotFound(String),
    /// The provided URL was rejected by the backend.
    InvalidUrl(String),
    /// The backend rejected or failed to apply a write.
    WriteFailed(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable(msg) => write!(f, "Backend unavailable: {}", msg),
            BackendError::NotFound(name) => write!(f, "Link not found: {}", name),
            BackendError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            BackendError::WriteFailed(msg) => write!(f, "Backend write failed: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
