//! Core refresh engine
//!
//! The RefreshEngine is responsible for one complete refresh:
//! - Resolving the target hostname and domain
//! - Verifying the provider credential
//! - Looking up the public IPv4 and IPv6 address
//! - Fetching the zone and its records
//! - Reconciling the A and AAAA record
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────┐   ┌────────────────────────┐
//! │ HostnameSource │   │ IpSource (v4) (v6)     │
//! └────────────────┘   └────────────────────────┘
//!         │ target              │ Option<IpAddr> ×2
//!         ▼                     ▼
//!       ┌──────────────────────────┐
//!       │      RefreshEngine       │
//!       └──────────────────────────┘
//!                     │ zone, records, reconcile A / AAAA
//!                     ▼
//!             ┌──────────────┐
//!             │ DnsProvider  │
//!             └──────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! 1. Configuration, hostname/domain, token, zone and listing errors abort the run
//! 2. A failed IP lookup only means "no address for this family"
//! 3. A failed A reconciliation does not prevent the AAAA one; the run still fails
//!
//! There are no retries: the scheduler running the tool is the retry loop.

pub mod reconcile;

pub use reconcile::{ReconcileOutcome, find_record, reconcile};

use crate::config::RefreshConfig;
use crate::error::{Error, Result};
use crate::target::resolve_target;
use crate::traits::{DnsProvider, HostnameSource, IpSource, IpVersion};
use crate::types::{DesiredState, DnsRecord, RefreshTarget, Zone};
use std::net::IpAddr;
use tracing::{debug, error, info, warn};

/// Summary of a successful refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    /// Resolved hostname and domain
    pub target: RefreshTarget,
    /// Zone the records live in
    pub zone: Zone,
    /// Public IPv4 address observed, if any
    pub ipv4: Option<IpAddr>,
    /// Public IPv6 address observed, if any
    pub ipv6: Option<IpAddr>,
    /// What happened to the A record
    pub a: ReconcileOutcome,
    /// What happened to the AAAA record
    pub aaaa: ReconcileOutcome,
}

impl RefreshReport {
    /// Whether any record was created, updated or deleted
    pub fn changed(&self) -> bool {
        self.a.is_change() || self.aaaa.is_change()
    }
}

/// Core refresh engine
///
/// ## Lifecycle
///
/// 1. Create with [`RefreshEngine::new()`] (validates configuration, no I/O)
/// 2. Call [`RefreshEngine::run()`] once per invocation
/// 3. Drop
pub struct RefreshEngine {
    /// DNS provider for reading and changing records
    provider: Box<dyn DnsProvider>,

    /// IPv4-only address lookup
    ipv4_source: Box<dyn IpSource>,

    /// IPv6-only address lookup
    ipv6_source: Box<dyn IpSource>,

    /// Refresh configuration
    config: RefreshConfig,
}

impl RefreshEngine {
    /// Create a new refresh engine
    ///
    /// # Parameters
    ///
    /// - `provider`: DNS provider implementation
    /// - `ipv4_source`: IP source returning IPv4 addresses
    /// - `ipv6_source`: IP source returning IPv6 addresses
    /// - `config`: Refresh configuration
    ///
    /// # Returns
    ///
    /// - `Ok(RefreshEngine)`
    /// - `Err(Error::Config)`: Invalid configuration or mismatched IP sources
    pub fn new(
        provider: Box<dyn DnsProvider>,
        ipv4_source: Box<dyn IpSource>,
        ipv6_source: Box<dyn IpSource>,
        config: RefreshConfig,
    ) -> Result<Self> {
        config.validate()?;

        if ipv4_source.version() != IpVersion::V4 || ipv6_source.version() != IpVersion::V6 {
            return Err(Error::config(
                "IP sources must be one IPv4 source and one IPv6 source",
            ));
        }

        Ok(Self {
            provider,
            ipv4_source,
            ipv6_source,
            config,
        })
    }

    /// Run one refresh
    ///
    /// # Parameters
    ///
    /// - `hosts`: Machine identity, used when no hostname override is configured
    ///
    /// # Returns
    ///
    /// - `Ok(RefreshReport)`: Both records are in the desired state
    /// - `Err(Error)`: The first fatal error; for record failures,
    ///   [`Error::Reconcile`] naming the family (IPv4 reported before IPv6)
    pub async fn run(&self, hosts: &dyn HostnameSource) -> Result<RefreshReport> {
        info!("Beginning dynamic DNS refresh");

        let target = resolve_target(&self.config.target, hosts)?;

        self.provider.verify_token().await.map_err(|e| match e {
            Error::Authentication(_) | Error::Config(_) => e,
            other => Error::auth(format!("Error while verifying API token: {}", other)),
        })?;
        debug!("API token verified with {}", self.provider.provider_name());

        let (ipv4, ipv6) = self.resolve_ips().await;

        let (zone, records) = self.fetch_zone_and_records(&target.domain).await?;

        let a = self.reconcile_family(&zone, &records, &target, IpVersion::V4, ipv4).await;
        let aaaa = self.reconcile_family(&zone, &records, &target, IpVersion::V6, ipv6).await;

        let (a, aaaa) = match (a, aaaa) {
            (Ok(a), Ok(aaaa)) => (a, aaaa),
            (Err(e), _) => return Err(e),
            (Ok(_), Err(e)) => return Err(e),
        };

        info!("Finished dynamic DNS refresh");

        Ok(RefreshReport {
            target,
            zone,
            ipv4,
            ipv6,
            a,
            aaaa,
        })
    }

    /// Look up both public addresses
    ///
    /// Lookups are independent; a failure only blanks its own family.
    async fn resolve_ips(&self) -> (Option<IpAddr>, Option<IpAddr>) {
        info!("Fetching current IP address...");

        let (ipv4, ipv6) = tokio::join!(
            resolve_ip(self.ipv4_source.as_ref()),
            resolve_ip(self.ipv6_source.as_ref()),
        );

        info!(">> IPv4: {}", display_ip(ipv4));
        info!(">> IPv6: {}", display_ip(ipv6));

        (ipv4, ipv6)
    }

    /// Resolve the zone for `domain` and list its records
    async fn fetch_zone_and_records(&self, domain: &str) -> Result<(Zone, Vec<DnsRecord>)> {
        info!("Fetching zone {}...", domain);

        let zone = self.provider.find_zone(domain).await.map_err(|e| {
            error!("Failed to get zone for {}: {}", domain, e);
            e
        })?;

        let records = self.provider.list_records(&zone).await.map_err(|e| {
            error!("Failed to get records for zone {}: {}", zone.id, e);
            e
        })?;

        info!(">> Zone ID: {}", zone.id);
        debug!("Zone {} has {} address record(s)", zone.name, records.len());

        Ok((zone, records))
    }

    async fn reconcile_family(
        &self,
        zone: &Zone,
        records: &[DnsRecord],
        target: &RefreshTarget,
        family: IpVersion,
        address: Option<IpAddr>,
    ) -> Result<ReconcileOutcome> {
        let desired = DesiredState::new(
            family.record_type(),
            target.hostname.clone(),
            address,
            self.config.proxied,
        );

        reconcile(self.provider.as_ref(), zone, records, &desired)
            .await
            .map_err(|e| {
                error!("Failed to update {} DNS record: {}", family, e);
                Error::reconcile(family, e)
            })
    }
}

/// Look up the address of one family, `None` on any failure
pub async fn resolve_ip(source: &dyn IpSource) -> Option<IpAddr> {
    let family = source.version();

    match source.current().await {
        Ok(ip) if family.matches(&ip) => Some(ip),
        Ok(ip) => {
            warn!("{} lookup returned {} address {}, ignoring", family, IpVersion::of(&ip), ip);
            None
        }
        Err(e) => {
            warn!("{} lookup failed: {}", family, e);
            None
        }
    }
}

fn display_ip(ip: Option<IpAddr>) -> String {
    ip.map(|ip| ip.to_string()).unwrap_or_else(|| "none".to_string())
}
