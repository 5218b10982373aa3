//! Error types for polling and snapshot storage.

use std::io;
use thiserror::Error;

/// Result type alias for poller operations.
pub type PollerResult<T> = Result<T, PollerError>;

/// Errors that can occur while running a poll pass or touching the
/// snapshot store.
#[derive(Debug, Error)]
pub enum PollerError {
    /// Worker pool was configured without any workers.
    #[error("Invalid worker count {0}, at least one worker is required")]
    InvalidWorkerCount(usize),

    /// Reading or writing a stored snapshot failed at the filesystem level.
    #[error("Snapshot store I/O for '{device}': {source}")]
    StoreIo {
        /// Device whose snapshot was being accessed.
        device: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A stored snapshot could not be encoded or decoded as JSON.
    #[error("Snapshot for '{device}' is not valid JSON: {source}")]
    StoreFormat {
        /// Device whose snapshot was being accessed.
        device: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl PollerError {
    /// Creates a store I/O error.
    pub fn store_io(device: impl Into<String>, source: io::Error) -> Self {
        Self::StoreIo {
            device: device.into(),
            source,
        }
    }

    /// Creates a store format error.
    pub fn store_format(device: impl Into<String>, source: serde_json::Error) -> Self {
        Self::StoreFormat {
            device: device.into(),
            source,
        }
    }
}
