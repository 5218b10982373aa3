//! Error types for the daemon.

use thiserror::Error;

/// Result type alias for daemon operations.
pub type Result<T> = std::result::Result<T, SwmapError>;

/// Errors that can occur while configuring or starting the daemon.
///
/// Nothing inside a running cycle surfaces here: per-device and per-port
/// problems are absorbed where they happen and show up as absences in the
/// published tables.
#[derive(Debug, Error)]
pub enum SwmapError {
    /// Configuration could not be parsed or failed validation.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Worker pool or snapshot store failure during startup.
    #[error(transparent)]
    Poller(#[from] swmap_poller::PollerError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = SwmapError::Configuration("polling.workers must be at least 1".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: polling.workers must be at least 1"
        );
    }

    #[test]
    fn test_poller_error_passes_through() {
        let err = SwmapError::from(swmap_poller::PollerError::InvalidWorkerCount(0));
        assert!(err.to_string().contains("Invalid worker count"));
    }
}
