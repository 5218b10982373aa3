//! Error types for validation and index building.

use thiserror::Error;

/// Result type alias for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Errors that can occur while turning raw snapshots into index tables.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The snapshot's top level was unusable, so the whole device was
    /// dropped from the cycle.
    #[error("Malformed snapshot for '{device}': {reason}")]
    MalformedSnapshot {
        /// Device the snapshot belonged to.
        device: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl IndexError {
    /// Creates a malformed snapshot error.
    pub fn malformed(device: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSnapshot {
            device: device.into(),
            reason: reason.into(),
        }
    }
}
