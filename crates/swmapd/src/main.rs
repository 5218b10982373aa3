//! Network Inventory Daemon
//!
//! Main entry point for swmapd. Polls the configured devices on a fixed
//! interval and rebuilds the five search tables (ARP, host, RARP,
//! ifAlias, ifIndex) used to locate MACs, IPs and interfaces across the
//! fleet.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use swmap_index::DnsHostResolver;
use swmap_poller::{DirSnapshotStore, PollWorkerPool, StoredSnapshotPoller};
use swmapd::{CycleOrchestrator, PublishedTables, Result, SwmapConfig, SwmapError};
use tokio::signal;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Default configuration file location
const DEFAULT_CONFIG_PATH: &str = "/etc/swmap/swmapd.conf";

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    info!("swmapd: Starting network inventory daemon");

    match run_daemon().await {
        Ok(()) => {
            info!("swmapd: Daemon exiting normally");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "swmapd: Daemon exiting with error");
            Err(Box::new(e) as Box<dyn std::error::Error>)
        }
    }
}

/// Initialize structured logging
fn init_logging() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .with_thread_ids(true)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| SwmapError::Configuration(format!("Failed to set logger: {}", e)))?;

    Ok(())
}

/// Main daemon loop
async fn run_daemon() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    let config = SwmapConfig::load_or_default(&config_path)?;
    config.validate()?;
    info!(
        devices = config.inventory.devices.len(),
        workers = config.polling.workers,
        interval_secs = config.polling.interval_secs,
        "swmapd: Configuration loaded"
    );

    let running = setup_signal_handlers();

    // Snapshots are collected out of band into the snapshot directory;
    // polling reads the latest file per device.
    let store = DirSnapshotStore::new(&config.inventory.snapshot_dir);
    let poller = Arc::new(StoredSnapshotPoller::new(store));
    let pool = PollWorkerPool::new(poller, config.polling.workers)?;
    let resolver = Arc::new(DnsHostResolver::new(config.dns_timeout()));

    let orchestrator = CycleOrchestrator::new(config, pool, resolver, PublishedTables::new());
    orchestrator.run(running).await;

    info!("swmapd: Graceful shutdown complete");
    Ok(())
}

/// Setup signal handlers for graceful shutdown. Returns the running
/// flag, cleared when a termination signal arrives.
fn setup_signal_handlers() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = running.clone();

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("swmapd: Received SIGINT/SIGTERM");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    running
}
