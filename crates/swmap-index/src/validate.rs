//! Turns raw poll results into typed snapshots.
//!
//! Damage is contained at the smallest scope that still yields usable
//! data: a malformed port or ARP row is skipped on its own, while a top
//! level or section of the wrong shape drops the device from the cycle.

use crate::error::{IndexError, IndexResult};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use swmap_common::{DeviceSnapshot, PortRecord, RawSnapshot};
use tracing::{debug, warn};

/// Typed snapshots for one cycle, plus the devices that failed validation.
#[derive(Debug, Default)]
pub struct ValidatedBatch {
    /// Usable snapshots, in device-name order.
    pub snapshots: Vec<DeviceSnapshot>,
    /// Devices dropped because their snapshot was unusable.
    pub dropped: BTreeMap<String, IndexError>,
}

/// Validates every snapshot in `raw`. Devices with an unusable snapshot
/// are dropped and reported; everything else is kept.
pub fn validate_batch(raw: &BTreeMap<String, RawSnapshot>) -> ValidatedBatch {
    let mut batch = ValidatedBatch::default();
    for (device, value) in raw {
        match validate_snapshot(device, value) {
            Ok(snapshot) => batch.snapshots.push(snapshot),
            Err(e) => {
                warn!(device = %device, error = %e, "Dropping device with malformed snapshot");
                batch.dropped.insert(device.clone(), e);
            }
        }
    }
    debug!(
        valid = batch.snapshots.len(),
        dropped = batch.dropped.len(),
        "Validated snapshot batch"
    );
    batch
}

/// Validates one device's raw snapshot.
///
/// The top level must be an object, and the optional `ports` and
/// `arpEntries` sections must be objects when present; anything else
/// fails the device. Individual ports or ARP rows that are malformed are
/// skipped without failing the device.
pub fn validate_snapshot(device: &str, raw: &RawSnapshot) -> IndexResult<DeviceSnapshot> {
    let top = raw
        .as_object()
        .ok_or_else(|| IndexError::malformed(device, "top level is not an object"))?;

    let mut snapshot = DeviceSnapshot::new(device);

    match top.get("ports") {
        None => {}
        Some(Value::Object(ports)) => {
            for (key, value) in ports {
                let Ok(ifindex) = key.parse::<u32>() else {
                    warn!(device, key = %key, "Skipping port with non-numeric ifIndex");
                    continue;
                };
                if let Some(port) = validate_port(device, ifindex, value) {
                    snapshot.ports.insert(ifindex, port);
                }
            }
        }
        Some(_) => return Err(IndexError::malformed(device, "ports section is not an object")),
    }

    match top.get("arpEntries") {
        None => {}
        Some(Value::Object(entries)) => {
            for (ip, mac) in entries {
                match mac.as_str() {
                    Some(mac) => {
                        snapshot.arp_entries.insert(ip.clone(), mac.to_string());
                    }
                    None => warn!(device, ip = %ip, "Skipping ARP entry with non-string MAC"),
                }
            }
        }
        Some(_) => {
            return Err(IndexError::malformed(
                device,
                "arpEntries section is not an object",
            ))
        }
    }

    Ok(snapshot)
}

/// Validates one port object. `isEthernet`, `isTrunk` and `ifAlias` are
/// required; a port missing any of them (or carrying it with the wrong
/// type) is skipped, leaving the device's other ports usable.
/// `macAddresses` is optional but must be a list when present.
fn validate_port(device: &str, ifindex: u32, value: &Value) -> Option<PortRecord> {
    let Some(port) = value.as_object() else {
        warn!(device, ifindex, "Skipping port that is not an object");
        return None;
    };

    let Some(is_ethernet) = port.get("isEthernet").and_then(Value::as_bool) else {
        warn!(device, ifindex, "Skipping port without a boolean isEthernet");
        return None;
    };
    let Some(is_trunk) = port.get("isTrunk").and_then(Value::as_bool) else {
        warn!(device, ifindex, "Skipping port without a boolean isTrunk");
        return None;
    };
    let Some(if_alias) = port.get("ifAlias").and_then(Value::as_str) else {
        warn!(device, ifindex, "Skipping port without a string ifAlias");
        return None;
    };

    let mut mac_addresses = BTreeSet::new();
    match port.get("macAddresses") {
        None => {}
        Some(Value::Array(macs)) => {
            for mac in macs {
                match mac.as_str() {
                    Some(mac) => {
                        mac_addresses.insert(mac.to_string());
                    }
                    None => debug!(device, ifindex, "Dropping non-string MAC address"),
                }
            }
        }
        Some(_) => {
            warn!(device, ifindex, "Skipping port with non-list macAddresses");
            return None;
        }
    }

    Some(PortRecord {
        is_ethernet,
        is_trunk,
        if_alias: if_alias.to_string(),
        mac_addresses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn port_json(ethernet: bool, trunk: bool, alias: &str, macs: &[&str]) -> Value {
        json!({
            "isEthernet": ethernet,
            "isTrunk": trunk,
            "ifAlias": alias,
            "macAddresses": macs,
        })
    }

    #[test]
    fn test_full_snapshot() {
        let raw = json!({
            "ports": {
                "3": port_json(true, false, "server42 nic1", &["aa:aa", "bb:bb"]),
            },
            "arpEntries": { "10.0.0.1": "aa:aa" }
        });

        let snapshot = validate_snapshot("switch1", &raw).expect("snapshot should validate");
        assert_eq!(snapshot.device_name, "switch1");
        assert_eq!(snapshot.ports.len(), 1);

        let port = &snapshot.ports[&3];
        assert!(port.is_ethernet);
        assert!(!port.is_trunk);
        assert_eq!(port.if_alias, "server42 nic1");
        assert_eq!(port.mac_addresses.len(), 2);
        assert_eq!(snapshot.arp_entries["10.0.0.1"], "aa:aa");
    }

    #[test]
    fn test_top_level_not_an_object() {
        for raw in [json!([1, 2, 3]), json!("text"), json!(null), json!(7)] {
            let result = validate_snapshot("switch1", &raw);
            assert!(matches!(result, Err(IndexError::MalformedSnapshot { .. })));
        }
    }

    #[test]
    fn test_missing_sections_yield_empty_snapshot() {
        let snapshot = validate_snapshot("switch1", &json!({})).expect("should validate");
        assert!(snapshot.ports.is_empty());
        assert!(snapshot.arp_entries.is_empty());
    }

    #[test]
    fn test_non_object_ports_section_fails_device() {
        let raw = json!({ "ports": [1, 2] });
        assert!(validate_snapshot("switch1", &raw).is_err());
    }

    #[test]
    fn test_non_object_arp_section_fails_device() {
        let raw = json!({ "arpEntries": "aa:aa" });
        assert!(validate_snapshot("switch1", &raw).is_err());
    }

    #[test]
    fn test_malformed_ports_skipped_individually() {
        let raw = json!({
            "ports": {
                "1": port_json(true, false, "kept", &[]),
                "junk": port_json(true, false, "bad key", &[]),
                "2": "not an object",
                "3": { "isEthernet": true, "isTrunk": false },
                "4": { "isEthernet": true, "isTrunk": false, "ifAlias": "x", "macAddresses": "oops" },
                "5": port_json(true, true, "also kept", &["cc:cc"]),
            }
        });

        let snapshot = validate_snapshot("switch1", &raw).expect("should validate");
        let kept: Vec<u32> = snapshot.ports.keys().copied().collect();
        assert_eq!(kept, vec![1, 5]);
    }

    #[test]
    fn test_port_missing_required_field_skipped() {
        let raw = json!({
            "ports": {
                "1": { "isTrunk": false, "ifAlias": "a" },
                "2": { "isEthernet": true, "ifAlias": "b" },
                "3": { "isEthernet": true, "isTrunk": false },
            }
        });

        let snapshot = validate_snapshot("switch1", &raw).expect("should validate");
        assert!(snapshot.ports.is_empty());
    }

    #[test]
    fn test_port_with_wrong_typed_required_field_skipped() {
        let raw = json!({
            "ports": {
                "1": { "isEthernet": "yes", "isTrunk": false, "ifAlias": "a" },
                "2": { "isEthernet": true, "isTrunk": 1, "ifAlias": "b" },
                "3": { "isEthernet": true, "isTrunk": false, "ifAlias": 42 },
            }
        });

        let snapshot = validate_snapshot("switch1", &raw).expect("should validate");
        assert!(snapshot.ports.is_empty());
    }

    #[test]
    fn test_missing_mac_list_is_empty() {
        let raw = json!({
            "ports": {
                "7": { "isEthernet": true, "isTrunk": false, "ifAlias": "srv" }
            }
        });

        let snapshot = validate_snapshot("switch1", &raw).expect("should validate");
        assert!(snapshot.ports[&7].mac_addresses.is_empty());
    }

    #[test]
    fn test_non_string_mac_elements_dropped() {
        let raw = json!({
            "ports": {
                "1": {
                    "isEthernet": true,
                    "isTrunk": false,
                    "ifAlias": "",
                    "macAddresses": ["aa:aa", 7, null, "bb:bb"],
                }
            }
        });

        let snapshot = validate_snapshot("switch1", &raw).expect("should validate");
        let macs: Vec<&str> = snapshot.ports[&1]
            .mac_addresses
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(macs, vec!["aa:aa", "bb:bb"]);
    }

    #[test]
    fn test_non_string_arp_mac_skipped() {
        let raw = json!({
            "arpEntries": { "10.0.0.1": "aa:aa", "10.0.0.2": 99 }
        });

        let snapshot = validate_snapshot("switch1", &raw).expect("should validate");
        assert_eq!(snapshot.arp_entries.len(), 1);
        assert!(snapshot.arp_entries.contains_key("10.0.0.1"));
    }

    #[test]
    fn test_batch_drops_only_malformed_devices() {
        let mut raw = BTreeMap::new();
        raw.insert("switch1".to_string(), json!({ "ports": {} }));
        raw.insert("switch2".to_string(), json!("garbage"));
        raw.insert("switch3".to_string(), json!({}));

        let batch = validate_batch(&raw);
        let kept: Vec<&str> = batch
            .snapshots
            .iter()
            .map(|s| s.device_name.as_str())
            .collect();
        assert_eq!(kept, vec!["switch1", "switch3"]);
        assert!(batch.dropped.contains_key("switch2"));
    }
}
