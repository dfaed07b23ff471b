//! Error types for the fetch and persistence halves of a cycle.
//!
//! Every failure a cycle can hit is one of these variants, so the main loop
//! can match on them and log each category distinctly instead of catching
//! everything generically.

use std::path::PathBuf;
use thiserror::Error;

/// Why a single fetch of the telegraph page produced no items.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The origin answered with something other than `200 OK`.
    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    /// The embedded JSON block could not be located in the HTML body.
    #[error("embedded JSON marker not found: {0}")]
    MarkerNotFound(&'static str),

    #[error("embedded JSON is malformed: {0}")]
    ParseError(#[from] serde_json::Error),

    /// A key on the path to the news list is missing (or is not the expected shape).
    #[error("JSON structure mismatch at key `{0}`")]
    SchemaMismatch(String),

    /// Transport-level fault: connection failure, timeout, body decoding.
    #[error("unexpected fetch failure: {0}")]
    Unexpected(String),
}

impl FetchError {
    /// Marker and schema faults usually mean the upstream page layout changed.
    pub fn is_upstream_drift(&self) -> bool {
        matches!(
            self,
            FetchError::MarkerNotFound(_) | FetchError::SchemaMismatch(_)
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            "timeout"
        } else if e.is_connect() {
            "connect"
        } else {
            "request"
        };
        FetchError::Unexpected(format!("{kind}: {e}"))
    }
}

/// Failure while writing an hourly snapshot to disk.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_drift_classification() {
        assert!(FetchError::MarkerNotFound("<script>").is_upstream_drift());
        assert!(FetchError::SchemaMismatch("props".into()).is_upstream_drift());
        assert!(!FetchError::HttpStatus(503).is_upstream_drift());
        assert!(!FetchError::Unexpected("connect: refused".into()).is_upstream_drift());
    }

    #[test]
    fn test_error_messages_name_the_cause() {
        assert_eq!(
            FetchError::HttpStatus(403).to_string(),
            "unexpected HTTP status 403"
        );
        assert_eq!(
            FetchError::SchemaMismatch("telegraphList".into()).to_string(),
            "JSON structure mismatch at key `telegraphList`"
        );

        let err = PersistError::Write {
            path: PathBuf::from("2025-05-06/10.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("2025-05-06/10.json"));
    }
}
