//! DNS resolver abstraction.

use async_trait::async_trait;
use std::net::IpAddr;

/// Resolves a hostname to every address a connection attempt could use.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Return all IPv4 and IPv6 addresses for `host`.
    ///
    /// `port` is only a resolution hint; implementations must not filter by it.
    async fn resolve(&self, host: &str, port: u16) -> std::io::Result<Vec<IpAddr>>;
}

