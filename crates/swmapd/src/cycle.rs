//! The recurring poll, validate, build, publish cycle.

use crate::config::SwmapConfig;
use crate::publish::PublishedTables;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use swmap_common::TableSet;
use swmap_index::{validate_batch, HostResolver, Layer2IndexBuilder, Layer3IndexBuilder};
use swmap_poller::PollWorkerPool;
use tracing::{debug, info, instrument};

/// How often a sleeping orchestrator rechecks the shutdown flag.
const SLEEP_SLICE: Duration = Duration::from_millis(250);

/// Engine phase, in the order a cycle passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    Idle,
    Polling,
    Validating,
    BuildingLayer2,
    BuildingLayer3,
    Publishing,
    Sleeping,
}

impl CyclePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CyclePhase::Idle => "idle",
            CyclePhase::Polling => "polling",
            CyclePhase::Validating => "validating",
            CyclePhase::BuildingLayer2 => "building_l2",
            CyclePhase::BuildingLayer3 => "building_l3",
            CyclePhase::Publishing => "publishing",
            CyclePhase::Sleeping => "sleeping",
        }
    }
}

impl std::fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What one cycle did, for logs and tests.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Cycle number, starting at 1.
    pub cycle: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Devices that produced a snapshot.
    pub devices_polled: usize,
    /// Devices whose poll failed.
    pub devices_failed: usize,
    /// Placeholder hostnames never polled.
    pub devices_skipped: usize,
    /// Devices dropped by validation.
    pub devices_dropped: usize,
    pub arp_entries: usize,
    pub host_entries: usize,
    pub rarp_entries: usize,
    pub alias_entries: usize,
    pub indexed_macs: usize,
}

impl CycleReport {
    /// Wall-clock time the cycle took.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Drives the cycle loop on a fixed interval.
///
/// Every cycle rebuilds all five tables from scratch and publishes them
/// as one unit; nothing carries over from the previous cycle. A cycle
/// that has started always runs to completion so in-flight polls drain
/// and a finished build is never discarded; the shutdown flag takes
/// effect between cycles and during sleep.
pub struct CycleOrchestrator {
    config: SwmapConfig,
    pool: PollWorkerPool,
    resolver: Arc<dyn HostResolver>,
    published: PublishedTables,
    phase: RwLock<CyclePhase>,
    cycles_run: AtomicU64,
}

impl CycleOrchestrator {
    pub fn new(
        config: SwmapConfig,
        pool: PollWorkerPool,
        resolver: Arc<dyn HostResolver>,
        published: PublishedTables,
    ) -> Self {
        Self {
            config,
            pool,
            resolver,
            published,
            phase: RwLock::new(CyclePhase::Idle),
            cycles_run: AtomicU64::new(0),
        }
    }

    /// Handle to the tables this orchestrator publishes into.
    pub fn published(&self) -> &PublishedTables {
        &self.published
    }

    /// Phase the engine is currently in.
    pub fn phase(&self) -> CyclePhase {
        *self.phase.read()
    }

    /// Cycles completed so far.
    pub fn cycles_run(&self) -> u64 {
        self.cycles_run.load(Ordering::Relaxed)
    }

    fn enter(&self, next: CyclePhase) {
        let mut phase = self.phase.write();
        debug!(from = %*phase, to = %next, "Phase transition");
        *phase = next;
    }

    /// Runs one full cycle and publishes the result.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> CycleReport {
        let cycle = self.cycles_run.load(Ordering::Relaxed) + 1;
        let started_at = Utc::now();

        self.enter(CyclePhase::Polling);
        let batch = self.pool.poll_all(&self.config.inventory.devices).await;

        self.enter(CyclePhase::Validating);
        let validated = validate_batch(&batch.snapshots);

        self.enter(CyclePhase::BuildingLayer2);
        let layer2 = Layer2IndexBuilder::new(self.resolver.as_ref())
            .build(&validated.snapshots)
            .await;

        self.enter(CyclePhase::BuildingLayer3);
        let layer3 = Layer3IndexBuilder::build(&validated.snapshots, &layer2.rarp);

        self.enter(CyclePhase::Publishing);
        let tables = TableSet {
            arp: layer2.arp,
            host: layer2.host,
            rarp: layer2.rarp,
            if_alias: layer3.if_alias,
            if_index: layer3.if_index,
        };
        let arp_entries = tables.arp.len();
        let host_entries = tables.host.len();
        let rarp_entries = tables.rarp.len();
        let alias_entries = tables.if_alias.len();
        let indexed_macs = tables.if_index.len();
        self.published.publish(tables);
        self.cycles_run.fetch_add(1, Ordering::Relaxed);

        let report = CycleReport {
            cycle,
            started_at,
            finished_at: Utc::now(),
            devices_polled: batch.snapshots.len(),
            devices_failed: batch.failed.len(),
            devices_skipped: batch.skipped.len(),
            devices_dropped: validated.dropped.len(),
            arp_entries,
            host_entries,
            rarp_entries,
            alias_entries,
            indexed_macs,
        };
        info!(
            cycle,
            polled = report.devices_polled,
            failed = report.devices_failed,
            skipped = report.devices_skipped,
            dropped = report.devices_dropped,
            arp = report.arp_entries,
            hosts = report.host_entries,
            rarp = report.rarp_entries,
            aliases = report.alias_entries,
            macs = report.indexed_macs,
            elapsed_ms = report.elapsed().num_milliseconds(),
            "Cycle published"
        );
        report
    }

    /// Runs cycles until `running` is cleared.
    pub async fn run(&self, running: Arc<AtomicBool>) {
        info!(
            devices = self.config.inventory.devices.len(),
            workers = self.pool.workers(),
            interval_secs = self.config.polling.interval_secs,
            "Cycle loop starting"
        );
        while running.load(Ordering::Relaxed) {
            self.run_cycle().await;
            if !running.load(Ordering::Relaxed) {
                break;
            }
            self.enter(CyclePhase::Sleeping);
            self.sleep_between_cycles(&running).await;
        }
        self.enter(CyclePhase::Idle);
        info!("Cycle loop stopped");
    }

    /// Sleeps the configured interval in short slices so a shutdown
    /// request is noticed promptly.
    async fn sleep_between_cycles(&self, running: &AtomicBool) {
        let mut remaining = self.config.poll_interval();
        while !remaining.is_zero() {
            if !running.load(Ordering::Relaxed) {
                return;
            }
            let slice = remaining.min(SLEEP_SLICE);
            tokio::time::sleep(slice).await;
            remaining -= slice;
        }
    }
}
