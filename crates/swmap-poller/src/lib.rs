//! Device polling for the swmap inventory engine.
//!
//! A [`PollWorkerPool`] drains a device list with a fixed number of
//! concurrent workers, calling whatever [`DevicePoller`] implementation it
//! was built with. Poll results come back raw; the index crates decide what
//! is actually usable. Failures are isolated per device and reported in the
//! [`PollBatch`] instead of aborting the pass.

pub mod device_poller;
pub mod error;
pub mod store;
pub mod worker_pool;

pub use device_poller::{DevicePoller, PollError};
pub use error::{PollerError, PollerResult};
pub use store::{DirSnapshotStore, SnapshotStore, StoredSnapshotPoller};
pub use worker_pool::{is_placeholder_hostname, PollBatch, PollWorkerPool};
