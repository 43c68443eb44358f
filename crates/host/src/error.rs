//! Error types for host-side operations.
//!
//! Handler failures never tear anything down: the dispatcher folds them into
//! an `{"error": "..."}` JSON object and sends that through the normal reply
//! path, exactly like a successful result.

use thiserror::Error;

/// Result type alias for host operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while executing a host operation.
#[derive(Debug, Error)]
pub enum Error {
    /// A required positional parameter was empty or malformed.
    #[error("Invalid params: {0}")]
    InvalidParams(&'static str),

    /// The frontend collaborator refused or failed the request.
    #[error("{0}")]
    Frontend(String),

    /// Runtime failure underneath the handler (hand-off timeout, transport,
    /// child supervision).
    #[error(transparent)]
    Runtime(#[from] webdock_runtime::Error),

    /// Reading a file larger than the bridge is willing to ship.
    #[error("File size is 1MB or higher")]
    FileTooLarge,

    /// A file path escaped the downloads directory.
    #[error("Invalid path: {0}")]
    PathOutsideDownloads(String),

    /// HTTP download failure.
    #[error("Http download file failed: {0}")]
    Download(String),

    /// Zip archive failure.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
