// # DNS Provider Trait
//
// Defines the interface for reading and changing DNS records via a
// provider API.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::DnsProvider;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let provider = /* DnsProvider implementation */;
//
//     provider.verify_token().await?;
//     let zone = provider.find_zone("example.com").await?;
//     let records = provider.list_records(&zone).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::types::{DnsRecord, NewRecord, RecordUpdate, Zone};

/// Trait for DNS provider implementations
///
/// Each method maps to exactly one logical provider operation. Deciding
/// *which* operation to perform is owned by the reconciler.
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Perform HTTP/HTTPS API calls to their endpoints only
/// - ✅ Parse provider-specific responses
/// - ✅ Return success or failure
///
/// ## Forbidden Capabilities
/// - ❌ Implement retry logic or backoff (the scheduler re-runs the tool)
/// - ❌ Decide whether an update is needed (owned by the reconciler)
/// - ❌ Cache state beyond single request
/// - ❌ Spawn tasks or threads
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Verify that the configured credential is usable
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The credential is active
    /// - `Err(Error::Authentication)`: The credential was rejected or is not active
    async fn verify_token(&self) -> Result<(), crate::Error>;

    /// Look up the zone for a domain by exact name
    ///
    /// # Returns
    ///
    /// - `Ok(Zone)`: The zone
    /// - `Err(Error::NotFound)`: No zone with that name exists
    async fn find_zone(&self, domain: &str) -> Result<Zone, crate::Error>;

    /// List all address records in a zone
    ///
    /// Implementations must follow pagination and return every page.
    /// Records are returned in provider order; the matcher relies on it.
    async fn list_records(&self, zone: &Zone) -> Result<Vec<DnsRecord>, crate::Error>;

    /// Create a record
    async fn create_record(
        &self,
        zone: &Zone,
        record: &NewRecord,
    ) -> Result<(), crate::Error>;

    /// Update content and proxied flag of an existing record
    async fn update_record(
        &self,
        zone: &Zone,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<(), crate::Error>;

    /// Delete a record
    async fn delete_record(&self, zone: &Zone, record_id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
