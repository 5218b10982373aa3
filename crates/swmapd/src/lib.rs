//! Daemon plumbing for the swmap inventory engine.
//!
//! Ties the poller and index crates into a recurring cycle: poll the
//! configured devices, validate what came back, build the five search
//! tables and publish them atomically, then sleep and go again.

pub mod config;
pub mod cycle;
pub mod error;
pub mod publish;

pub use config::SwmapConfig;
pub use cycle::{CycleOrchestrator, CyclePhase, CycleReport};
pub use error::{Result, SwmapError};
pub use publish::PublishedTables;
