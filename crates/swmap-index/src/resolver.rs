//! Reverse-DNS resolution for ARP-table IPs.

use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, trace};

/// Resolves an IP address to a hostname, best effort.
///
/// Failure is ordinary here. An address with no name simply yields `None`
/// and the tables omit the hostname; nothing upstream treats it as an
/// error.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve(&self, ip: &str) -> Option<String>;
}

/// Resolver backed by the system's reverse DNS.
///
/// The underlying lookup is a synchronous libc call, so it runs on the
/// blocking pool and is abandoned past the configured deadline.
pub struct DnsHostResolver {
    timeout: Duration,
}

impl DnsHostResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl HostResolver for DnsHostResolver {
    async fn resolve(&self, ip: &str) -> Option<String> {
        let addr: IpAddr = match ip.parse() {
            Ok(addr) => addr,
            Err(_) => {
                trace!(ip, "Not a parseable IP address, skipping reverse lookup");
                return None;
            }
        };

        let lookup = tokio::task::spawn_blocking(move || dns_lookup::lookup_addr(&addr));
        match tokio::time::timeout(self.timeout, lookup).await {
            // getnameinfo echoes the address back when there is no PTR
            // record; that is "no name", not a hostname.
            Ok(Ok(Ok(hostname))) if hostname == addr.to_string() => {
                trace!(ip, "Reverse lookup returned the address itself");
                None
            }
            Ok(Ok(Ok(hostname))) => Some(hostname),
            Ok(Ok(Err(e))) => {
                trace!(ip, error = %e, "Reverse lookup failed");
                None
            }
            Ok(Err(e)) => {
                debug!(ip, error = %e, "Reverse lookup task failed");
                None
            }
            Err(_) => {
                debug!(ip, timeout_ms = self.timeout.as_millis() as u64, "Reverse lookup timed out");
                None
            }
        }
    }
}
