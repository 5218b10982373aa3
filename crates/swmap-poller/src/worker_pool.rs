//! Fixed-width worker pool that drains a device list.

use crate::device_poller::{DevicePoller, PollError};
use crate::error::{PollerError, PollerResult};
use crate::store::SnapshotStore;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use swmap_common::RawSnapshot;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

/// Returns true for hostnames that mark an unconfigured inventory slot:
/// the empty string or the literal "none" in any case.
pub fn is_placeholder_hostname(name: &str) -> bool {
    name.is_empty() || name.eq_ignore_ascii_case("none")
}

/// Outcome of one poll pass over a device list.
#[derive(Debug, Default)]
pub struct PollBatch {
    /// Raw snapshots keyed by device name, for the devices that answered.
    pub snapshots: BTreeMap<String, RawSnapshot>,
    /// Placeholder hostnames that were never queued, in input order.
    pub skipped: Vec<String>,
    /// Devices whose poll failed, with the reason.
    pub failed: BTreeMap<String, PollError>,
}

impl PollBatch {
    /// Number of devices that produced a snapshot.
    pub fn polled_count(&self) -> usize {
        self.snapshots.len()
    }
}

/// Polls many devices with a fixed number of concurrent workers.
///
/// Devices queue in input order and each idle worker takes the next one,
/// so at most `workers` polls are in flight at any moment. A failing
/// device is recorded and the pass moves on.
pub struct PollWorkerPool {
    poller: Arc<dyn DevicePoller>,
    workers: usize,
    store: Option<Arc<dyn SnapshotStore>>,
}

impl PollWorkerPool {
    /// Creates a pool running at most `workers` polls concurrently.
    pub fn new(poller: Arc<dyn DevicePoller>, workers: usize) -> PollerResult<Self> {
        if workers == 0 {
            return Err(PollerError::InvalidWorkerCount(workers));
        }
        Ok(Self {
            poller,
            workers,
            store: None,
        })
    }

    /// Also persist every successful snapshot to `store` as it arrives.
    /// A store failure is logged and the device stays in the batch.
    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Number of concurrent workers this pool runs.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Polls every non-placeholder device in `devices` and collects the
    /// outcomes. Never fails as a whole; per-device errors land in
    /// [`PollBatch::failed`].
    #[instrument(skip(self, devices))]
    pub async fn poll_all(&self, devices: &[String]) -> PollBatch {
        let mut batch = PollBatch::default();
        let mut queue = VecDeque::new();
        for name in devices {
            if is_placeholder_hostname(name) {
                debug!(device = %name, "Skipping placeholder hostname");
                batch.skipped.push(name.clone());
            } else {
                queue.push_back(name.clone());
            }
        }

        let queued = queue.len();
        let queue = Arc::new(Mutex::new(queue));
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut handles = Vec::with_capacity(self.workers);
        for worker_id in 0..self.workers {
            let queue = Arc::clone(&queue);
            let poller = Arc::clone(&self.poller);
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                loop {
                    let device = queue.lock().pop_front();
                    let Some(device) = device else {
                        break;
                    };
                    debug!(worker_id, device = %device, "Polling device");
                    let result = poller.poll(&device).await;
                    if tx.send((device, result)).is_err() {
                        break;
                    }
                }
            }));
        }
        drop(tx);

        while let Some((device, result)) = rx.recv().await {
            match result {
                Ok(snapshot) => {
                    if let Some(store) = &self.store {
                        if let Err(e) = store.save(&device, &snapshot) {
                            warn!(device = %device, error = %e, "Failed to persist snapshot");
                        }
                    }
                    batch.snapshots.insert(device, snapshot);
                }
                Err(e) => {
                    warn!(device = %device, error = %e, "Device poll failed");
                    batch.failed.insert(device, e);
                }
            }
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Poll worker task panicked");
            }
        }

        info!(
            queued,
            polled = batch.snapshots.len(),
            failed = batch.failed.len(),
            skipped = batch.skipped.len(),
            "Poll pass complete"
        );
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct ScriptedPoller {
        fail: BTreeSet<String>,
        calls: Mutex<Vec<String>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedPoller {
        fn new(fail: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                fail: fail.iter().map(|d| d.to_string()).collect(),
                calls: Mutex::new(Vec::new()),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DevicePoller for ScriptedPoller {
        async fn poll(&self, device: &str) -> Result<RawSnapshot, PollError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().push(device.to_string());

            tokio::time::sleep(Duration::from_millis(10)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail.contains(device) {
                Err(PollError::Unreachable(format!("{device} is down")))
            } else {
                Ok(serde_json::json!({ "device": device, "ports": {} }))
            }
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_placeholder_hostnames() {
        assert!(is_placeholder_hostname(""));
        assert!(is_placeholder_hostname("none"));
        assert!(is_placeholder_hostname("NONE"));
        assert!(is_placeholder_hostname("None"));
        assert!(!is_placeholder_hostname("switch1"));
        assert!(!is_placeholder_hostname("none2"));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let poller = ScriptedPoller::new(&[]);
        let result = PollWorkerPool::new(poller, 0);
        assert!(matches!(result, Err(PollerError::InvalidWorkerCount(0))));
    }

    #[tokio::test]
    async fn test_placeholders_skipped_without_polling() {
        let poller = ScriptedPoller::new(&[]);
        let pool = PollWorkerPool::new(Arc::clone(&poller) as Arc<dyn DevicePoller>, 2)
            .expect("valid pool");

        let batch = pool
            .poll_all(&names(&["", "none", "NONE", "switch1"]))
            .await;

        assert_eq!(batch.skipped, names(&["", "none", "NONE"]));
        assert_eq!(batch.snapshots.len(), 1);
        assert!(batch.snapshots.contains_key("switch1"));
        assert_eq!(poller.calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_each_device_polled_exactly_once() {
        let poller = ScriptedPoller::new(&[]);
        let pool = PollWorkerPool::new(Arc::clone(&poller) as Arc<dyn DevicePoller>, 3)
            .expect("valid pool");

        let devices = names(&["a", "b", "c", "d", "e"]);
        let batch = pool.poll_all(&devices).await;

        assert_eq!(batch.snapshots.len(), 5);
        let mut calls = poller.calls.lock().clone();
        calls.sort();
        assert_eq!(calls, devices);
    }

    #[tokio::test]
    async fn test_concurrency_stays_within_worker_count() {
        let poller = ScriptedPoller::new(&[]);
        let pool = PollWorkerPool::new(Arc::clone(&poller) as Arc<dyn DevicePoller>, 2)
            .expect("valid pool");

        let devices: Vec<String> = (0..10).map(|i| format!("switch{i}")).collect();
        let batch = pool.poll_all(&devices).await;

        assert_eq!(batch.snapshots.len(), 10);
        assert!(poller.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_successful_snapshots_are_persisted() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = Arc::new(crate::store::DirSnapshotStore::new(dir.path()));

        let poller = ScriptedPoller::new(&["switch2"]);
        let pool = PollWorkerPool::new(Arc::clone(&poller) as Arc<dyn DevicePoller>, 2)
            .expect("valid pool")
            .with_store(Arc::clone(&store) as Arc<dyn SnapshotStore>);

        pool.poll_all(&names(&["switch1", "switch2"])).await;

        assert!(store.load("switch1").expect("load failed").is_some());
        assert!(store.load("switch2").expect("load failed").is_none());
    }

    #[tokio::test]
    async fn test_failed_device_does_not_abort_pass() {
        let poller = ScriptedPoller::new(&["switch2"]);
        let pool = PollWorkerPool::new(Arc::clone(&poller) as Arc<dyn DevicePoller>, 2)
            .expect("valid pool");

        let batch = pool
            .poll_all(&names(&["switch1", "switch2", "switch3"]))
            .await;

        assert_eq!(batch.snapshots.len(), 2);
        assert!(batch.snapshots.contains_key("switch1"));
        assert!(batch.snapshots.contains_key("switch3"));
        assert!(matches!(
            batch.failed.get("switch2"),
            Some(PollError::Unreachable(_))
        ));
    }

    #[tokio::test]
    async fn test_more_workers_than_devices() {
        let poller = ScriptedPoller::new(&[]);
        let pool = PollWorkerPool::new(Arc::clone(&poller) as Arc<dyn DevicePoller>, 8)
            .expect("valid pool");

        let batch = pool.poll_all(&names(&["switch1"])).await;
        assert_eq!(batch.polled_count(), 1);
    }
}
