//! Snapshot validation and index building for the swmap inventory engine.
//!
//! The pipeline runs in two strictly ordered stages over one cycle's
//! snapshots: [`Layer2IndexBuilder`] derives the ARP, host and RARP tables,
//! then [`Layer3IndexBuilder`] derives the interface tables, reading the
//! finished RARP table it is handed. Raw snapshots pass through
//! [`validate_batch`] first; nothing downstream ever sees untyped data.

pub mod error;
pub mod layer2;
pub mod layer3;
pub mod resolver;
pub mod validate;

pub use error::{IndexError, IndexResult};
pub use layer2::{Layer2IndexBuilder, Layer2Tables};
pub use layer3::{Layer3IndexBuilder, Layer3Tables};
pub use resolver::{DnsHostResolver, HostResolver};
pub use validate::{validate_batch, validate_snapshot, ValidatedBatch};
