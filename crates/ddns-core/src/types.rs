//! DNS data model shared by the engine and provider implementations
//!
//! Everything here is transient: fetched or computed on each run and
//! dropped when the run ends.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// DNS record type handled by the refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    /// A record (IPv4)
    #[serde(rename = "A")]
    A,
    /// AAAA record (IPv6)
    #[serde(rename = "AAAA")]
    Aaaa,
}

impl RecordType {
    /// Wire name of the record type
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            other => Err(crate::Error::invalid_input(format!(
                "Unsupported record type: {}",
                other
            ))),
        }
    }
}

/// Provider zone for a domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider-assigned zone identifier (opaque)
    pub id: String,
    /// Domain name the zone represents
    pub name: String,
}

/// An existing DNS record as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-assigned record identifier (opaque)
    pub id: String,
    /// Record type
    pub record_type: RecordType,
    /// Fully qualified record name
    pub name: String,
    /// Record content (the address as text)
    pub content: String,
    /// Whether traffic is routed through the provider's edge
    pub proxied: bool,
}

/// Payload for creating a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub record_type: RecordType,
    pub name: String,
    pub content: String,
    pub proxied: bool,
}

/// Payload for updating an existing record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub content: String,
    pub proxied: bool,
}

/// What a single record should look like after reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    /// Record type
    pub record_type: RecordType,
    /// Hostname the record is for
    pub hostname: String,
    /// Desired address, `None` when the machine has none for this family
    pub address: Option<IpAddr>,
    /// Proxied flag applied on create and update
    pub proxied: bool,
}

impl DesiredState {
    /// Create a desired state
    pub fn new(
        record_type: RecordType,
        hostname: impl Into<String>,
        address: Option<IpAddr>,
        proxied: bool,
    ) -> Self {
        Self {
            record_type,
            hostname: hostname.into(),
            address,
            proxied,
        }
    }
}

/// Resolved hostname and registrable domain for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTarget {
    /// Hostname whose records are refreshed
    pub hostname: String,
    /// Domain whose zone holds the records
    pub domain: String,
}
