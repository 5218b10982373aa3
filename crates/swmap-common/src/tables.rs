//! The five searchable index tables and the published set.
//!
//! All tables key on `BTreeMap` so iteration order is deterministic, and all
//! nested levels are created through explicit record/upsert methods. Lookups
//! never create entries, so a read against a missing key cannot leave an
//! empty level behind.

use crate::ordered_set::OrderedSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row of the ARP index: what was known about an IP address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArpEntry {
    /// MAC address the IP resolved to in a device ARP table.
    pub mac_address: String,
    /// Reverse-DNS name for the IP, when resolution succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

/// IP address -> MAC address and optional resolved hostname.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArpTable {
    entries: BTreeMap<String, ArpEntry>,
}

impl ArpTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the row for `ip`. Later observations of the
    /// same IP win, including their hostname outcome.
    pub fn upsert(
        &mut self,
        ip: impl Into<String>,
        mac: impl Into<String>,
        hostname: Option<String>,
    ) {
        self.entries.insert(
            ip.into(),
            ArpEntry {
                mac_address: mac.into(),
                hostname,
            },
        );
    }

    pub fn get(&self, ip: &str) -> Option<&ArpEntry> {
        self.entries.get(ip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ArpEntry)> {
        self.entries.iter()
    }
}

/// Resolved hostname -> IP address. Last writer wins on collisions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostTable {
    entries: BTreeMap<String, String>,
}

impl HostTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `hostname` resolved from `ip`, overwriting any
    /// previous IP recorded for the same name.
    pub fn record(&mut self, hostname: impl Into<String>, ip: impl Into<String>) {
        self.entries.insert(hostname.into(), ip.into());
    }

    pub fn get(&self, hostname: &str) -> Option<&str> {
        self.entries.get(hostname).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }
}

/// MAC address -> IPs observed for it, in first-seen order.
///
/// A MAC with an empty IP set is meaningful: it was learned on an access
/// port but never appeared in any device ARP table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RarpTable {
    entries: BTreeMap<String, OrderedSet<String>>,
}

impl RarpTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `ip` to the set for `mac`, creating the entry if needed.
    /// Duplicate IPs for the same MAC are ignored.
    pub fn append_ip(&mut self, mac: impl Into<String>, ip: impl Into<String>) {
        self.entries.entry(mac.into()).or_default().insert(ip.into());
    }

    /// Ensures `mac` is present, with an empty IP set if new.
    pub fn ensure_mac(&mut self, mac: impl Into<String>) {
        self.entries.entry(mac.into()).or_default();
    }

    pub fn contains_mac(&self, mac: &str) -> bool {
        self.entries.contains_key(mac)
    }

    /// IPs recorded for `mac`, or `None` when the MAC was never seen.
    pub fn ips(&self, mac: &str) -> Option<&OrderedSet<String>> {
        self.entries.get(mac)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OrderedSet<String>)> {
        self.entries.iter()
    }
}

/// Interface alias text -> device name -> ifIndexes carrying that alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IfAliasTable {
    entries: BTreeMap<String, BTreeMap<String, OrderedSet<u32>>>,
}

impl IfAliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `device` carries `alias` on `ifindex`. Both nesting
    /// levels are created on first use; duplicate ifIndexes are ignored.
    pub fn record(&mut self, alias: impl Into<String>, device: impl Into<String>, ifindex: u32) {
        self.entries
            .entry(alias.into())
            .or_default()
            .entry(device.into())
            .or_default()
            .insert(ifindex);
    }

    /// Devices carrying `alias`, or `None` when the alias is unknown.
    pub fn devices(&self, alias: &str) -> Option<&BTreeMap<String, OrderedSet<u32>>> {
        self.entries.get(alias)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeMap<String, OrderedSet<u32>>)> {
        self.entries.iter()
    }
}

/// MAC address -> device name -> ifIndex -> IPs known for the MAC.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IfIndexTable {
    entries: BTreeMap<String, BTreeMap<String, BTreeMap<u32, OrderedSet<String>>>>,
}

impl IfIndexTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `mac` was learned on `device`/`ifindex`, attaching the
    /// IP set known for the MAC at record time.
    pub fn record(
        &mut self,
        mac: impl Into<String>,
        device: impl Into<String>,
        ifindex: u32,
        ips: OrderedSet<String>,
    ) {
        self.entries
            .entry(mac.into())
            .or_default()
            .entry(device.into())
            .or_default()
            .insert(ifindex, ips);
    }

    /// Locations `mac` was learned on, or `None` when the MAC is unknown.
    pub fn locations(&self, mac: &str) -> Option<&BTreeMap<String, BTreeMap<u32, OrderedSet<String>>>> {
        self.entries.get(mac)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&String, &BTreeMap<String, BTreeMap<u32, OrderedSet<String>>>)> {
        self.entries.iter()
    }
}

/// The five tables one cycle produces, published together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSet {
    pub arp: ArpTable,
    pub host: HostTable,
    pub rarp: RarpTable,
    pub if_alias: IfAliasTable,
    pub if_index: IfIndexTable,
}

impl TableSet {
    pub fn new() -> Self {
        Self::default()
    }
}
