//! Host/domain resolution
//!
//! Works out which hostname to refresh and which zone it lives in:
//!
//! - hostname: the override, or the machine hostname
//! - domain: the override, or the registrable domain (eTLD+1) of the
//!   hostname according to the public suffix list
//!
//! Both failures are fatal; nothing after this step is meaningful without
//! a target.

use crate::config::TargetConfig;
use crate::error::{Error, Result};
use crate::traits::HostnameSource;
use crate::types::RefreshTarget;
use tracing::info;

/// Resolve the hostname and domain for this run
///
/// # Parameters
///
/// - `target`: Overrides from configuration
/// - `hosts`: Machine identity, consulted only when no hostname override is set
///
/// # Returns
///
/// - `Ok(RefreshTarget)`: Lowercased hostname and its domain
/// - `Err(Error::Resolution)`: If either could not be determined
pub fn resolve_target(target: &TargetConfig, hosts: &dyn HostnameSource) -> Result<RefreshTarget> {
    let hostname = match target.hostname_override() {
        Some(hostname) => hostname.to_string(),
        None => hosts.hostname()?,
    };

    let hostname = normalize(&hostname);
    if hostname.is_empty() {
        return Err(Error::resolution("Failed to get hostname: hostname is empty"));
    }

    let domain = match target.domain_override() {
        Some(domain) => normalize(domain),
        None => registrable_domain(&hostname)?,
    };

    info!(">> Hostname: {}", hostname);
    info!(">> Domain: {}", domain);

    Ok(RefreshTarget { hostname, domain })
}

/// Derive the registrable domain (public suffix plus one label)
///
/// ```
/// use ddns_core::target::registrable_domain;
///
/// assert_eq!(registrable_domain("host.example.co.uk").unwrap(), "example.co.uk");
/// assert!(registrable_domain("localhost").is_err());
/// ```
pub fn registrable_domain(hostname: &str) -> Result<String> {
    if hostname.split('.').any(str::is_empty) {
        return Err(Error::resolution(format!(
            "Failed to get effective TLD: empty label in domain {:?}",
            hostname
        )));
    }

    psl::domain_str(hostname)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::resolution(format!(
                "Failed to get effective TLD: {} has no registrable domain",
                hostname
            ))
        })
}

fn normalize(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
