//! Shared types for the swmap network-inventory engine.
//!
//! This crate holds the data model the poller and index builders agree on:
//! the typed per-device snapshot produced by validation, the insertion-ordered
//! set used for IP and ifIndex lists, and the five searchable tables a cycle
//! publishes as one unit.

mod ordered_set;
mod tables;
mod types;

pub use ordered_set::OrderedSet;
pub use tables::{
    ArpEntry, ArpTable, HostTable, IfAliasTable, IfIndexTable, RarpTable, TableSet,
};
pub use types::{DeviceSnapshot, PortRecord, RawSnapshot};
