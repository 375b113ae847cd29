//! Core traits for the DDNS refresh
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`IpSource`]: Look up the public address for one family
//! - [`DnsProvider`]: Read and change DNS records via provider APIs
//! - [`HostnameSource`]: Machine identity used when no hostname is given
//! - [`Sandbox`]: Optional process-level privilege restriction

pub mod ip_source;
pub mod dns_provider;
pub mod host_identity;
pub mod sandbox;

pub use ip_source::{IpSource, IpVersion};
pub use dns_provider::DnsProvider;
pub use host_identity::{HostnameSource, SystemHostname};
pub use sandbox::{NoopSandbox, Sandbox};
