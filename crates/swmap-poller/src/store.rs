//! On-disk persistence for raw snapshots.
//!
//! Snapshots are kept one JSON file per device so operators can inspect
//! what a device reported, and so collection can run out of band from
//! indexing when needed.

use crate::device_poller::{DevicePoller, PollError};
use crate::error::{PollerError, PollerResult};
use async_trait::async_trait;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use swmap_common::RawSnapshot;
use tracing::debug;

/// Persists and retrieves raw snapshots by device name.
pub trait SnapshotStore: Send + Sync {
    /// Saves `snapshot` as the current snapshot for `device`, replacing
    /// any previous one.
    fn save(&self, device: &str, snapshot: &RawSnapshot) -> PollerResult<()>;

    /// Loads the current snapshot for `device`, or `None` when the device
    /// has never been saved.
    fn load(&self, device: &str) -> PollerResult<Option<RawSnapshot>>;
}

/// Stores each device's snapshot as `<dir>/<device>.json`.
///
/// Device names are sanitized to a safe file name, so a name containing
/// path separators cannot escape the store directory.
pub struct DirSnapshotStore {
    dir: PathBuf,
}

impl DirSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, device: &str) -> PathBuf {
        let safe: String = device
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl SnapshotStore for DirSnapshotStore {
    fn save(&self, device: &str, snapshot: &RawSnapshot) -> PollerResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| PollerError::store_io(device, e))?;
        let encoded =
            serde_json::to_vec_pretty(snapshot).map_err(|e| PollerError::store_format(device, e))?;
        let path = self.path_for(device);
        fs::write(&path, encoded).map_err(|e| PollerError::store_io(device, e))?;
        debug!(device, path = %path.display(), "Saved snapshot");
        Ok(())
    }

    fn load(&self, device: &str) -> PollerResult<Option<RawSnapshot>> {
        let path = self.path_for(device);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PollerError::store_io(device, e)),
        };
        let snapshot =
            serde_json::from_slice(&bytes).map_err(|e| PollerError::store_format(device, e))?;
        Ok(Some(snapshot))
    }
}

/// A poller that answers from the snapshot store instead of the network.
///
/// Used when collection runs out of band: some other process keeps the
/// store current and the engine "polls" by reading the latest file. A
/// device with no stored snapshot reads as unreachable, which keeps the
/// per-device failure semantics of a live poller.
pub struct StoredSnapshotPoller<S> {
    store: S,
}

impl<S> StoredSnapshotPoller<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: SnapshotStore> DevicePoller for StoredSnapshotPoller<S> {
    async fn poll(&self, device: &str) -> Result<RawSnapshot, PollError> {
        match self.store.load(device) {
            Ok(Some(snapshot)) => Ok(snapshot),
            Ok(None) => Err(PollError::Unreachable(format!(
                "no stored snapshot for '{device}'"
            ))),
            Err(PollerError::StoreIo { source, .. }) => Err(PollError::Io(source)),
            Err(e) => Err(PollError::Protocol(e.to_string())),
        }
    }
}
