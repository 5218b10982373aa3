//! Configuration file support for swmapd.
//!
//! Loads and validates swmapd configuration from TOML files.
//! Default location: /etc/swmap/swmapd.conf

use crate::error::{Result, SwmapError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Device inventory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Candidate device hostnames, polled in the order listed
    #[serde(default)]
    pub devices: Vec<String>,

    /// Directory raw snapshots are stored in
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

/// Poll cycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Number of concurrent poll workers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Seconds to sleep between cycles
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

/// Reverse DNS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DnsConfig {
    /// Per-lookup deadline in milliseconds
    #[serde(default = "default_dns_timeout")]
    pub timeout_ms: u64,
}

/// Complete swmapd configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwmapConfig {
    /// Device inventory
    #[serde(default)]
    pub inventory: InventoryConfig,

    /// Poll cycle settings
    #[serde(default)]
    pub polling: PollingConfig,

    /// Reverse DNS settings
    #[serde(default)]
    pub dns: DnsConfig,
}

// Default functions
fn default_snapshot_dir() -> PathBuf {
    PathBuf::from("/var/lib/swmap/snapshots")
}

fn default_workers() -> usize {
    4
}

fn default_interval() -> u64 {
    300
}

fn default_dns_timeout() -> u64 {
    500
}

// Default implementations
impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            snapshot_dir: default_snapshot_dir(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            interval_secs: default_interval(),
        }
    }
}

impl Default for DnsConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_dns_timeout(),
        }
    }
}

impl SwmapConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                let config = toml::from_str(&content).map_err(|e| {
                    SwmapError::Configuration(format!(
                        "Failed to parse config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                eprintln!(
                    "swmapd: Config file {} not found, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            Err(e) => Err(SwmapError::Io(e)),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> Result<Self> {
        Self::load_or_default("/etc/swmap/swmapd.conf")
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| SwmapError::Configuration(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content).map_err(SwmapError::Io)?;

        Ok(())
    }

    /// Get sleep interval between cycles as Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.polling.interval_secs)
    }

    /// Get reverse DNS deadline as Duration
    pub fn dns_timeout(&self) -> Duration {
        Duration::from_millis(self.dns.timeout_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.polling.workers == 0 {
            return Err(SwmapError::Configuration(
                "polling.workers must be at least 1".to_string(),
            ));
        }

        if self.polling.interval_secs == 0 {
            return Err(SwmapError::Configuration(
                "polling.interval_secs must be at least 1".to_string(),
            ));
        }

        if self.dns.timeout_ms == 0 {
            return Err(SwmapError::Configuration(
                "dns.timeout_ms must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
