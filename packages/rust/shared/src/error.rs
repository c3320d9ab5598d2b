//! Error types for kbsync.
//!
//! Library crates use [`KbSyncError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

use crate::types::RecordKind;

/// Top-level error type for all kbsync operations.
#[derive(Debug, thiserror::Error)]
pub enum KbSyncError {
    /// Missing or invalid configuration (environment, token, flags).
    #[error("config error: {message}")]
    Config { message: String },

    /// Malformed CSV input.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A single remote call failed (transport error or non-2xx response).
    ///
    /// `status` is `None` when the request never produced a response.
    #[error("remote error (status {}): {body}", status.map_or_else(|| "none".to_string(), |s| s.to_string()))]
    Remote { status: Option<u16>, body: String },

    /// The remote listing that a bulk deletion depends on could not be fetched.
    ///
    /// Unlike a single failed call this aborts the run: creating records on
    /// top of an unknown remote state would break the delete-before-create
    /// ordering.
    #[error("failed to list remote {kind}: {source}")]
    Listing {
        kind: RecordKind,
        source: Box<KbSyncError>,
    },

    /// JSON serialization of an output document failed.
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, KbSyncError>;

impl KbSyncError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a remote error from an optional HTTP status and response body.
    pub fn remote(status: Option<u16>, body: impl Into<String>) -> Self {
        Self::Remote {
            status,
            body: body.into(),
        }
    }

    /// Wrap the failure of a listing call made ahead of a bulk deletion.
    pub fn listing(kind: RecordKind, source: KbSyncError) -> Self {
        Self::Listing {
            kind,
            source: Box::new(source),
        }
    }

    /// Whether this error should abort the whole run.
    ///
    /// Remote failures are per-item and only get logged by the caller.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Remote { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = KbSyncError::config("unknown environment 'prod'");
        assert_eq!(err.to_string(), "config error: unknown environment 'prod'");

        let err = KbSyncError::remote(Some(409), "conflict");
        assert_eq!(err.to_string(), "remote error (status 409): conflict");

        let err = KbSyncError::remote(None, "connection refused");
        assert!(err.to_string().contains("status none"));
    }

    #[test]
    fn only_remote_errors_are_non_fatal() {
        assert!(!KbSyncError::remote(Some(500), "boom").is_fatal());
        assert!(KbSyncError::parse("unterminated quote").is_fatal());
        assert!(KbSyncError::config("missing token").is_fatal());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(KbSyncError::io("Intents.csv", io).is_fatal());
    }

    #[test]
    fn failed_listing_is_fatal() {
        let err = KbSyncError::listing(
            RecordKind::Entities,
            KbSyncError::remote(Some(403), "forbidden"),
        );
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "failed to list remote entities: remote error (status 403): forbidden"
        );
    }
}
