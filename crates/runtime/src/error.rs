//! Error types for the webdock runtime.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the webdock runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// Could not bind the bridge service's listen port. Fatal to bridge start.
    #[error("Failed to bind bridge service on port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// The peer did not become ready within the deadline.
    #[error("Timed out waiting for peer on port {0}")]
    ConnectTimeout(u16),

    /// The channel is latched disconnected; no further calls will be made.
    #[error("Bridge channel is disconnected")]
    Disconnected,

    /// Transport-level failure (framing, read, or write).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The peer acknowledged the call with an error status.
    #[error("Peer rejected call: {0}")]
    Rejected(String),

    /// The main-thread hand-off did not complete within its bounded wait.
    #[error("Main-thread hand-off timed out after {0:?}")]
    HandoffTimeout(Duration),

    /// The main loop has been torn down; no more hand-offs are possible.
    #[error("Main loop is gone")]
    MainLoopClosed,

    /// Failed to launch or supervise the child process.
    #[error("Failed to launch child process: {0}")]
    LaunchFailed(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
