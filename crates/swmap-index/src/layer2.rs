//! First build stage: ARP, host and RARP tables.

use crate::resolver::HostResolver;
use swmap_common::{ArpTable, DeviceSnapshot, HostTable, RarpTable};
use tracing::{debug, info, instrument};

/// Tables produced by the first build stage.
#[derive(Debug, Default)]
pub struct Layer2Tables {
    pub arp: ArpTable,
    pub host: HostTable,
    pub rarp: RarpTable,
}

/// Builds the ARP, host and RARP tables from one cycle's snapshots.
///
/// Every ARP row contributes an ARP entry, a RARP IP and, when reverse
/// DNS answers, a host entry. Every MAC learned on an access port is
/// guaranteed a RARP key even if no ARP row ever mentioned it, so "seen
/// on a port but never routed" is distinguishable from "never seen".
pub struct Layer2IndexBuilder<'a> {
    resolver: &'a dyn HostResolver,
}

impl<'a> Layer2IndexBuilder<'a> {
    pub fn new(resolver: &'a dyn HostResolver) -> Self {
        Self { resolver }
    }

    /// Ingests `snapshots` in the order given and returns the finished
    /// tables. Identical input yields identical tables, including the
    /// order of per-MAC IP lists.
    #[instrument(skip_all)]
    pub async fn build(&self, snapshots: &[DeviceSnapshot]) -> Layer2Tables {
        let mut tables = Layer2Tables::default();
        for snapshot in snapshots {
            self.ingest(snapshot, &mut tables).await;
        }
        info!(
            arp = tables.arp.len(),
            hosts = tables.host.len(),
            rarp = tables.rarp.len(),
            "Built layer-2 tables"
        );
        tables
    }

    async fn ingest(&self, snapshot: &DeviceSnapshot, tables: &mut Layer2Tables) {
        for (ip, mac) in &snapshot.arp_entries {
            // Resolution is attempted per occurrence; the last device to
            // mention an IP decides its hostname column.
            let hostname = self.resolver.resolve(ip).await;
            if let Some(hostname) = &hostname {
                tables.host.record(hostname.clone(), ip.clone());
            }
            tables.arp.upsert(ip.clone(), mac.clone(), hostname);
            tables.rarp.append_ip(mac.clone(), ip.clone());
        }

        for (_, port) in snapshot.access_ports() {
            for mac in &port.mac_addresses {
                tables.rarp.ensure_mac(mac.clone());
            }
        }

        debug!(
            device = %snapshot.device_name,
            arp_rows = snapshot.arp_entries.len(),
            "Ingested device into layer-2 tables"
        );
    }
}
