//! The polling seam between the engine and a device transport.

use async_trait::async_trait;
use swmap_common::RawSnapshot;
use thiserror::Error;

/// Why a single device poll produced no snapshot.
///
/// These stay per-device: one failing device never aborts the pass it is
/// part of.
#[derive(Debug, Error)]
pub enum PollError {
    /// The device did not answer within the transport's deadline.
    #[error("Poll timed out after {0} seconds")]
    Timeout(u64),

    /// The device could not be reached at all.
    #[error("Device unreachable: {0}")]
    Unreachable(String),

    /// The device answered with something the transport could not use.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Local I/O failure while talking to the device.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PollError {
    /// Returns true if the failure is transient and the next cycle is
    /// likely to succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PollError::Timeout(_) | PollError::Unreachable(_))
    }
}

/// Fetches the raw snapshot for one device.
///
/// Implementations own the transport details (deadlines, credentials,
/// retries); the worker pool only schedules calls and collects outcomes.
#[async_trait]
pub trait DevicePoller: Send + Sync {
    /// Polls `device` and returns whatever it reported. The shape of the
    /// returned value is unknown until validation.
    async fn poll(&self, device: &str) -> Result<RawSnapshot, PollError>;
}
