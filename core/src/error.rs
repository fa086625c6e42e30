//! Error types for the labmon-core library.

use thiserror::Error;

/// Result type alias for labmon operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while collecting status data.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to execute a system command.
    #[error("command execution failed: {0}")]
    CommandFailed(String),

    /// Failed to parse command output.
    #[error("failed to parse output: {0}")]
    Parse(String),

    /// A monitor's external dependency is missing or unusable.
    #[error("monitor unavailable: {0}")]
    MonitorUnavailable(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
