// # Cloudflare DNS Provider
//
// This crate provides the Cloudflare DNS provider for the DDNS refresh.
//
// ## Behaviour
//
// - ✅ One HTTP request per provider operation (listing: one per page)
// - ✅ Full error propagation; no retry, no backoff
// - ✅ HTTP timeout configured (30 seconds)
// - ✅ Specific error handling for HTTP status codes (401/403, 404, 409, 429, 5xx)
// - ✅ Dry-run mode: reads are performed, changes are only logged
// - ✅ A and AAAA records
// - ❌ NO caching between runs
// - ❌ NO background tasks
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Provider MUST fail fast if token is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - Verify Token: GET `/user/tokens/verify`
// - List Zones: GET `/zones?name=...`
// - List DNS Records: GET `/zones/:zone_id/dns_records?page=...&per_page=...`
// - Create DNS Record: POST `/zones/:zone_id/dns_records`
// - Patch DNS Record: PATCH `/zones/:zone_id/dns_records/:record_id`
// - Delete DNS Record: DELETE `/zones/:zone_id/dns_records/:record_id`

mod wire;

use async_trait::async_trait;
use ddns_core::config::ProviderConfig;
use ddns_core::traits::DnsProvider;
use ddns_core::types::{DnsRecord, NewRecord, RecordType, RecordUpdate, Zone};
use ddns_core::{Error, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;

use wire::{ApiResponse, CreateRecordBody, PatchRecordBody, RecordResult, TokenStatus, ZoneResult};

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Records requested per listing page (Cloudflare maximum for this endpoint)
const RECORDS_PER_PAGE: u32 = 100;

const PROVIDER: &str = "cloudflare";

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform all GET requests (token verification, zone lookup, record listing)
/// - Log the intended POST/PATCH/DELETE payload
/// - **NOT** actually modify DNS records
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// API base URL (overridable for tests)
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip changes
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:Read and DNS:Edit permissions
    /// - `dry_run`: If true, perform reads but skip changes
    ///
    /// # Returns
    ///
    /// - `Err(Error::Config)`: The token is empty
    /// - `Err(Error::Http)`: The HTTP client could not be built
    pub fn new(api_token: impl Into<String>, dry_run: bool) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.trim().is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_token,
            base_url: CLOUDFLARE_API_BASE.to_string(),
            client,
            dry_run,
        })
    }

    /// Create a provider from configuration
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        match config {
            ProviderConfig::Cloudflare { api_token, dry_run } => {
                if *dry_run {
                    tracing::warn!(
                        "Cloudflare provider running in DRY-RUN mode - no changes will be made"
                    );
                }
                Self::new(api_token.clone(), *dry_run)
            }
        }
    }

    /// Point the provider at a different API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Whether changes are only logged
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn records_url(&self, zone: &Zone) -> String {
        self.url(&format!("/zones/{}/dns_records", zone.id))
    }

    fn record_url(&self, zone: &Zone, record_id: &str) -> String {
        self.url(&format!("/zones/{}/dns_records/{}", zone.id, record_id))
    }

    /// Send an authenticated request and unwrap the API envelope
    ///
    /// `context` names the operation in error messages.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        context: &str,
    ) -> Result<ApiResponse<T>> {
        let response = request
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::http(format!("{}: HTTP request failed: {}", context, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());

        if !status.is_success() {
            return Err(status_error(status, &body, context));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
        if !envelope.success {
            return Err(Error::provider(
                PROVIDER,
                format!("{} failed: {}", context, envelope.error_summary()),
            ));
        }

        Ok(envelope)
    }

    /// Fetch one page of records
    async fn list_page(&self, zone: &Zone, page: u32) -> Result<ApiResponse<Vec<RecordResult>>> {
        let request = self.client.get(self.records_url(zone)).query(&[
            ("page", page.to_string()),
            ("per_page", RECORDS_PER_PAGE.to_string()),
        ]);

        self.send(request, "Record listing").await
    }
}

/// Map a non-2xx status to an error
fn status_error(status: StatusCode, body: &str, context: &str) -> Error {
    let detail = serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        .map(|envelope| envelope.error_summary())
        .unwrap_or_else(|_| body.to_string());

    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "{}: Invalid API token or insufficient permissions. Status: {} - {}",
            context, status, detail
        )),
        404 => Error::not_found(format!("{}: {} - {}", context, status, detail)),
        409 => Error::provider(
            PROVIDER,
            format!("{}: Conflict with existing record. Status: {} - {}", context, status, detail),
        ),
        429 => Error::rate_limited(format!(
            "{}: Rate limit exceeded. Please retry later. Status: {}",
            context, status
        )),
        500..=599 => Error::provider(
            PROVIDER,
            format!("{}: Cloudflare server error (transient): {} - {}", context, status, detail),
        ),
        _ => Error::provider(PROVIDER, format!("{} failed: {} - {}", context, status, detail)),
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Verify the API token
    ///
    /// ```http
    /// GET /user/tokens/verify
    /// Authorization: Bearer <token>
    /// ```
    async fn verify_token(&self) -> Result<()> {
        let request = self.client.get(self.url("/user/tokens/verify"));

        let envelope: ApiResponse<TokenStatus> = self
            .send(request, "Token verification")
            .await
            .map_err(|e| match e {
                Error::NotFound(msg) => Error::auth(msg),
                other => other,
            })?;

        let status = envelope
            .result
            .map(|token| token.status)
            .unwrap_or_else(|| "unknown".to_string());

        if status != "active" {
            return Err(Error::auth(format!(
                "Error while verifying API token: token is {}",
                status
            )));
        }

        tracing::debug!("Cloudflare API token is active");
        Ok(())
    }

    /// Look up the zone for a domain
    ///
    /// ```http
    /// GET /zones?name=example.com
    /// ```
    async fn find_zone(&self, domain: &str) -> Result<Zone> {
        tracing::debug!("Looking up zone ID for domain: {}", domain);

        let request = self.client.get(self.url("/zones")).query(&[("name", domain)]);
        let envelope: ApiResponse<Vec<ZoneResult>> = self.send(request, "Zone lookup").await?;

        let zone = envelope
            .result
            .unwrap_or_default()
            .into_iter()
            .find(|zone| zone.name == domain)
            .ok_or_else(|| Error::not_found(format!("Zone not found: {}", domain)))?;

        tracing::debug!("Found zone ID: {}", zone.id);
        Ok(Zone {
            id: zone.id,
            name: zone.name,
        })
    }

    /// List all A/AAAA records in a zone, following pagination
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?page=1&per_page=100
    /// ```
    async fn list_records(&self, zone: &Zone) -> Result<Vec<DnsRecord>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let envelope = self.list_page(zone, page).await?;
            let total_pages = envelope.total_pages();
            let batch = envelope.result.unwrap_or_default();
            let batch_len = batch.len();

            records.extend(batch.into_iter().filter_map(|record| {
                match record.record_type.parse::<RecordType>() {
                    Ok(record_type) => Some(DnsRecord {
                        id: record.id,
                        record_type,
                        name: record.name,
                        content: record.content,
                        proxied: record.proxied,
                    }),
                    Err(_) => {
                        tracing::trace!("Skipping {} record {}", record.record_type, record.name);
                        None
                    }
                }
            }));

            if page >= total_pages || batch_len == 0 {
                break;
            }
            page += 1;
        }

        tracing::debug!("Fetched {} address record(s) from zone {}", records.len(), zone.id);
        Ok(records)
    }

    /// Create a record
    ///
    /// ```http
    /// POST /zones/:zone_id/dns_records
    /// { "type": "A", "name": "host.example.com", "content": "1.2.3.4", "proxied": false }
    /// ```
    async fn create_record(&self, zone: &Zone, record: &NewRecord) -> Result<()> {
        let body = CreateRecordBody {
            record_type: record.record_type.as_str(),
            name: &record.name,
            content: &record.content,
            proxied: record.proxied,
        };

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send POST request to {} with payload: {}",
                self.records_url(zone),
                serde_json::to_string(&body)?
            );
            return Ok(());
        }

        let request = self.client.post(self.records_url(zone)).json(&body);
        let _: ApiResponse<RecordResult> = self.send(request, "Record creation").await?;

        tracing::info!("DNS record created: {} -> {}", record.name, record.content);
        Ok(())
    }

    /// Update content and proxied flag of a record
    ///
    /// ```http
    /// PATCH /zones/:zone_id/dns_records/:record_id
    /// { "content": "1.2.3.4", "proxied": false }
    /// ```
    async fn update_record(
        &self,
        zone: &Zone,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<()> {
        let body = PatchRecordBody {
            content: &update.content,
            proxied: update.proxied,
        };

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PATCH request to {} with payload: {}",
                self.record_url(zone, record_id),
                serde_json::to_string(&body)?
            );
            return Ok(());
        }

        let request = self.client.patch(self.record_url(zone, record_id)).json(&body);
        let _: ApiResponse<RecordResult> = self.send(request, "Record update").await?;

        tracing::info!("DNS record {} updated: {}", record_id, update.content);
        Ok(())
    }

    /// Delete a record
    ///
    /// ```http
    /// DELETE /zones/:zone_id/dns_records/:record_id
    /// ```
    async fn delete_record(&self, zone: &Zone, record_id: &str) -> Result<()> {
        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send DELETE request to {}",
                self.record_url(zone, record_id)
            );
            return Ok(());
        }

        let request = self.client.delete(self.record_url(zone, record_id));
        let _: ApiResponse<serde_json::Value> = self.send(request, "Record deletion").await?;

        tracing::info!("DNS record {} deleted", record_id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}
