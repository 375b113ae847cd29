// # IP Source Trait
//
// Defines the interface for looking up the machine's public address for one
// address family.
//
// ## Implementations
//
// - HTTP-based: `ddns-ip-http` crate (icanhazip-style endpoints)
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* IpSource implementation */;
//
//     // One lookup, no caching
//     let current_ip = source.current().await?;
//     println!("{:?} address is {}", source.version(), current_ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;

use crate::types::RecordType;

/// IP version (v4 or v6)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// The DNS record type carrying addresses of this family
    pub fn record_type(self) -> RecordType {
        match self {
            IpVersion::V4 => RecordType::A,
            IpVersion::V6 => RecordType::Aaaa,
        }
    }

    /// Check whether `ip` belongs to this family
    pub fn matches(self, ip: &IpAddr) -> bool {
        match self {
            IpVersion::V4 => ip.is_ipv4(),
            IpVersion::V6 => ip.is_ipv6(),
        }
    }

    /// Family of an address
    pub fn of(ip: &IpAddr) -> Self {
        match ip {
            IpAddr::V4(_) => IpVersion::V4,
            IpAddr::V6(_) => IpVersion::V6,
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => f.write_str("IPv4"),
            IpVersion::V6 => f.write_str("IPv6"),
        }
    }
}

/// Trait for IP source implementations
///
/// An IP source answers one question: what is the public address of this
/// machine for the family it serves. Implementations must be thread-safe.
///
/// # Trust Level: Semi-Trusted
///
/// ## Allowed Capabilities
/// - ✅ Perform I/O towards their lookup endpoint
/// - ✅ Parse and validate the returned address
///
/// ## Forbidden Capabilities
/// - ❌ Perform DNS updates (use `DnsProvider`)
/// - ❌ Implement retry logic or fall back to other endpoints
/// - ❌ Cache results between runs
/// - ❌ Decide whether a failed lookup is fatal (owned by `RefreshEngine`)
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current IP address
    ///
    /// Exactly one lookup attempt per call.
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddr)`: The current address, guaranteed to be of [`IpSource::version`]
    /// - `Err(Error)`: If the lookup failed or returned something unusable
    async fn current(&self) -> Result<IpAddr, crate::Error>;

    /// Get the IP version this source looks up
    fn version(&self) -> IpVersion;
}
