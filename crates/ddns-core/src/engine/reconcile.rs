//! Record matching and reconciliation
//!
//! ```text
//! existing \ desired │ None          │ Some(ip)
//! ───────────────────┼───────────────┼──────────────────────────────
//! None               │ Absent        │ Created
//! Some(record)       │ Deleted       │ Unchanged if content == ip
//!                    │               │ Updated   otherwise
//! ```
//!
//! Every non-trivial cell is exactly one provider call.

use crate::error::Result;
use crate::traits::DnsProvider;
use crate::types::{DesiredState, DnsRecord, NewRecord, RecordType, RecordUpdate, Zone};
use std::net::IpAddr;
use tracing::{error, info};

/// Result of reconciling one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// No record and no address (no-op)
    Absent,
    /// Record already had the desired content (no-op)
    Unchanged {
        /// The current content
        content: String,
    },
    /// Record was created
    Created {
        /// The created content
        content: String,
    },
    /// Record content was replaced
    Updated {
        /// The previous content
        previous: String,
        /// The new content
        content: String,
    },
    /// Record was deleted because no address is available
    Deleted {
        /// The content of the deleted record
        previous: String,
    },
}

impl ReconcileOutcome {
    /// Whether the provider was asked to change anything
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            ReconcileOutcome::Created { .. }
                | ReconcileOutcome::Updated { .. }
                | ReconcileOutcome::Deleted { .. }
        )
    }
}

/// Find the record for `(record_type, hostname)`
///
/// Linear scan in list order; the first match wins and later duplicates
/// are ignored. Names are compared exactly.
pub fn find_record<'a>(
    records: &'a [DnsRecord],
    record_type: RecordType,
    hostname: &str,
) -> Option<&'a DnsRecord> {
    records
        .iter()
        .find(|record| record.name == hostname && record.record_type == record_type)
}

/// Bring the record for `desired` in line with the desired address
///
/// # Parameters
///
/// - `provider`: Provider performing the (single) call
/// - `zone`: Zone the records belong to
/// - `records`: Records fetched for the zone at the start of the run
/// - `desired`: Wanted type, name, address and proxied flag
///
/// # Returns
///
/// - `Ok(ReconcileOutcome)`: What was done
/// - `Err(Error)`: The provider error, unchanged
pub async fn reconcile(
    provider: &dyn DnsProvider,
    zone: &Zone,
    records: &[DnsRecord],
    desired: &DesiredState,
) -> Result<ReconcileOutcome> {
    let existing = find_record(records, desired.record_type, &desired.hostname);

    info!(
        "Updating {} record for {}",
        desired.record_type, desired.hostname
    );

    let result = apply(provider, zone, existing, desired).await;
    if let Err(e) = &result {
        error!(">> Error: {}", e);
    }
    result
}

async fn apply(
    provider: &dyn DnsProvider,
    zone: &Zone,
    existing: Option<&DnsRecord>,
    desired: &DesiredState,
) -> Result<ReconcileOutcome> {
    match (existing, desired.address) {
        (None, None) => {
            info!(">> none -> none");
            Ok(ReconcileOutcome::Absent)
        }
        (Some(record), None) => {
            info!(">> {} -> none", record.content);
            provider.delete_record(zone, &record.id).await?;
            Ok(ReconcileOutcome::Deleted {
                previous: record.content.clone(),
            })
        }
        (None, Some(ip)) => {
            let content = content_of(ip);
            info!(">> none -> {}", content);
            let new_record = NewRecord {
                record_type: desired.record_type,
                name: desired.hostname.clone(),
                content: content.clone(),
                proxied: desired.proxied,
            };
            provider.create_record(zone, &new_record).await?;
            Ok(ReconcileOutcome::Created { content })
        }
        (Some(record), Some(ip)) => {
            let content = content_of(ip);
            info!(">> {} -> {}", record.content, content);
            if record.content == content {
                return Ok(ReconcileOutcome::Unchanged { content });
            }

            let update = RecordUpdate {
                content: content.clone(),
                proxied: desired.proxied,
            };
            provider.update_record(zone, &record.id, &update).await?;
            Ok(ReconcileOutcome::Updated {
                previous: record.content.clone(),
                content,
            })
        }
    }
}

fn content_of(ip: IpAddr) -> String {
    ip.to_string()
}
