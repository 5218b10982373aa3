//! Atomic publication of a cycle's tables.

use parking_lot::RwLock;
use std::sync::Arc;
use swmap_common::TableSet;

/// Shared handle to the most recently published table set.
///
/// Tables are built privately by the orchestrator; `publish` swaps a
/// single pointer, so a reader always holds either the previous cycle's
/// complete set or the new one, never a mix. Clones share the same slot.
#[derive(Clone, Default)]
pub struct PublishedTables {
    current: Arc<RwLock<Arc<TableSet>>>,
}

impl PublishedTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last published set; empty tables before the first publish.
    /// The returned `Arc` stays valid across later publishes.
    pub fn current(&self) -> Arc<TableSet> {
        Arc::clone(&self.current.read())
    }

    /// Replaces all five tables at once, dropping this handle's claim on
    /// the previous set.
    pub fn publish(&self, tables: TableSet) {
        *self.current.write() = Arc::new(tables);
    }
}
