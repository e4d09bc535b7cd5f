//! Error types for fdfs-tracker.

use thiserror::Error;

/// Tracker status code for "no such group / file / server".
pub const STATUS_NOT_FOUND: u8 = 2;

/// Main error type for all tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A request field cannot be represented in its fixed wire width.
    ///
    /// Raised before any I/O happens.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Transport failure while writing or reading a frame (includes timeouts).
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// Response bytes do not match the shape expected for the command.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The tracker answered with a non-zero status.
    #[error("Tracker returned status {0}")]
    Remote(u8),

    /// Configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(String),
}

impl TrackerError {
    /// Whether the connection used for the failed call can go back to the pool.
    ///
    /// `Remote` means the frame was read completely; `Encoding` fails before
    /// the connection is touched. Everything else leaves the stream at an
    /// unknown frame position.
    pub fn is_connection_reusable(&self) -> bool {
        matches!(self, TrackerError::Remote(_) | TrackerError::Encoding(_))
    }

    /// Status code reported by the tracker, if this is a `Remote` error.
    pub fn status(&self) -> Option<u8> {
        match self {
            TrackerError::Remote(status) => Some(*status),
            _ => None,
        }
    }

    /// Check if the tracker reported "not found".
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(STATUS_NOT_FOUND)
    }
}

/// Result type alias using TrackerError.
pub type Result<T> = std::result::Result<T, TrackerError>;
