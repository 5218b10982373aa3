//! Second build stage: interface alias and ifIndex tables.

use swmap_common::{DeviceSnapshot, IfAliasTable, IfIndexTable, RarpTable};
use tracing::{debug, info, instrument};

/// Tables produced by the second build stage.
#[derive(Debug, Default)]
pub struct Layer3Tables {
    pub if_alias: IfAliasTable,
    pub if_index: IfIndexTable,
}

/// Builds the interface tables from one cycle's snapshots.
///
/// Takes the finished [`RarpTable`] from the first stage: the IP lists
/// attached to ifIndex records are copied out of it, so it must be
/// complete before this stage starts. Only ethernet, non-trunk ports are
/// indexed; a trunk's MAC list is not attributable to one endpoint and
/// its alias describes the link, not a host.
pub struct Layer3IndexBuilder;

impl Layer3IndexBuilder {
    /// Walks devices in the order given and their access ports in
    /// ascending ifIndex order, indexing aliases and learned MACs.
    #[instrument(skip_all)]
    pub fn build(snapshots: &[DeviceSnapshot], rarp: &RarpTable) -> Layer3Tables {
        let mut tables = Layer3Tables::default();
        for snapshot in snapshots {
            for (ifindex, port) in snapshot.access_ports() {
                if let Some(alias) = port.trimmed_alias() {
                    tables
                        .if_alias
                        .record(alias, snapshot.device_name.clone(), ifindex);
                }

                for mac in &port.mac_addresses {
                    // First-stage coverage should make every access-port
                    // MAC a RARP key; tolerate a gap by not indexing it.
                    let Some(ips) = rarp.ips(mac) else {
                        debug!(device = %snapshot.device_name, ifindex, mac = %mac,
                            "MAC missing from RARP table, not indexed");
                        continue;
                    };
                    tables.if_index.record(
                        mac.clone(),
                        snapshot.device_name.clone(),
                        ifindex,
                        ips.clone(),
                    );
                }
            }
        }
        info!(
            aliases = tables.if_alias.len(),
            macs = tables.if_index.len(),
            "Built layer-3 tables"
        );
        tables
    }
}
