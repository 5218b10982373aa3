//! Snapshot types produced by polling and validation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Raw per-device poll result, shape unknown until validated.
///
/// Pollers hand these back as-is; only the validator decides whether a
/// value actually describes a device.
pub type RawSnapshot = serde_json::Value;

/// One port of a polled device, as recovered by validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRecord {
    /// Whether the port is a physical Ethernet interface.
    pub is_ethernet: bool,
    /// Whether the port is configured as a trunk/uplink.
    pub is_trunk: bool,
    /// Configured interface alias, possibly empty or whitespace.
    pub if_alias: String,
    /// MAC addresses learned on this port.
    pub mac_addresses: BTreeSet<String>,
}

impl PortRecord {
    /// Returns the alias with surrounding whitespace removed, or `None`
    /// when nothing but whitespace was configured.
    pub fn trimmed_alias(&self) -> Option<&str> {
        let alias = self.if_alias.trim();
        if alias.is_empty() {
            None
        } else {
            Some(alias)
        }
    }

    /// An access port is an Ethernet port that is not a trunk; only these
    /// ports contribute learned MACs to the indexes.
    pub fn is_access(&self) -> bool {
        self.is_ethernet && !self.is_trunk
    }
}

/// Everything learned from one device during one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Device name the snapshot was polled under.
    pub device_name: String,
    /// Ports keyed by ifIndex; iteration order is ascending ifIndex.
    pub ports: BTreeMap<u32, PortRecord>,
    /// ARP rows observed on the device, keyed by IP address.
    pub arp_entries: BTreeMap<String, String>,
}

impl DeviceSnapshot {
    /// Creates an empty snapshot for `device_name`.
    pub fn new(device_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            ports: BTreeMap::new(),
            arp_entries: BTreeMap::new(),
        }
    }

    /// Adds a port record, replacing any previous record for `ifindex`.
    pub fn with_port(mut self, ifindex: u32, port: PortRecord) -> Self {
        self.ports.insert(ifindex, port);
        self
    }

    /// Adds an ARP row, replacing any previous row for `ip`.
    pub fn with_arp_entry(mut self, ip: impl Into<String>, mac: impl Into<String>) -> Self {
        self.arp_entries.insert(ip.into(), mac.into());
        self
    }

    /// Iterates the access ports in ascending ifIndex order.
    pub fn access_ports(&self) -> impl Iterator<Item = (u32, &PortRecord)> {
        self.ports
            .iter()
            .filter(|(_, port)| port.is_access())
            .map(|(ifindex, port)| (*ifindex, port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access_port(alias: &str, macs: &[&str]) -> PortRecord {
        PortRecord {
            is_ethernet: true,
            is_trunk: false,
            if_alias: alias.to_string(),
            mac_addresses: macs.iter().map(|m| m.to_string()).collect(),
        }
    }

    #[test]
    fn test_trimmed_alias() {
        let port = access_port("  uplink to core  ", &[]);
        assert_eq!(port.trimmed_alias(), Some("uplink to core"));
    }

    #[test]
    fn test_trimmed_alias_whitespace_only() {
        assert_eq!(access_port("   ", &[]).trimmed_alias(), None);
        assert_eq!(access_port("", &[]).trimmed_alias(), None);
    }

    #[test]
    fn test_is_access() {
        assert!(access_port("a", &[]).is_access());

        let trunk = PortRecord {
            is_ethernet: true,
            is_trunk: true,
            ..Default::default()
        };
        assert!(!trunk.is_access());

        let virtual_port = PortRecord {
            is_ethernet: false,
            is_trunk: false,
            ..Default::default()
        };
        assert!(!virtual_port.is_access());
    }

    #[test]
    fn test_access_ports_skips_trunks_and_virtuals() {
        let trunk = PortRecord {
            is_ethernet: true,
            is_trunk: true,
            ..Default::default()
        };
        let virtual_port = PortRecord::default();
        let snapshot = DeviceSnapshot::new("switch1")
            .with_port(3, access_port("c", &["aa:aa"]))
            .with_port(1, access_port("a", &[]))
            .with_port(2, trunk)
            .with_port(4, virtual_port);

        let indexes: Vec<u32> = snapshot.access_ports().map(|(i, _)| i).collect();
        assert_eq!(indexes, vec![1, 3]);
    }

    #[test]
    fn test_ports_iterate_in_ascending_ifindex_order() {
        let snapshot = DeviceSnapshot::new("switch1")
            .with_port(30, PortRecord::default())
            .with_port(2, PortRecord::default())
            .with_port(10, PortRecord::default());

        let order: Vec<u32> = snapshot.ports.keys().copied().collect();
        assert_eq!(order, vec![2, 10, 30]);
    }
}
