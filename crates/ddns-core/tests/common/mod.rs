//! Test doubles and common utilities for refresh contract tests
//!
//! The doubles record every call so tests can assert exactly which
//! provider operations a run issued.

#![allow(dead_code)]

use ddns_core::config::{ProviderConfig, RefreshConfig, TargetConfig};
use ddns_core::error::{Error, Result};
use ddns_core::traits::{DnsProvider, HostnameSource, IpSource, IpVersion};
use ddns_core::types::{DnsRecord, NewRecord, RecordType, RecordUpdate, Zone};
use ddns_core::RefreshEngine;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const HOSTNAME: &str = "host.example.com";
pub const DOMAIN: &str = "example.com";
pub const ZONE_ID: &str = "zone-123";

/// A provider call, as observed by [`MockDnsProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCall {
    VerifyToken,
    FindZone(String),
    ListRecords(String),
    Create(NewRecord),
    Update { id: String, update: RecordUpdate },
    Delete(String),
}

impl ProviderCall {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            ProviderCall::Create(_) | ProviderCall::Update { .. } | ProviderCall::Delete(_)
        )
    }
}

#[derive(Default)]
struct ProviderState {
    zones: Vec<Zone>,
    records: Vec<DnsRecord>,
    calls: Vec<ProviderCall>,
    next_id: usize,
    reject_token: bool,
    unreachable_verify: bool,
    fail_listing: bool,
    fail_mutations_for: Option<RecordType>,
}

/// An in-memory provider that tracks calls
///
/// Clones share state, so a test can keep one handle while the engine owns
/// another.
#[derive(Clone, Default)]
pub struct MockDnsProvider {
    state: Arc<Mutex<ProviderState>>,
}

impl MockDnsProvider {
    /// Provider hosting the `example.com` zone with the given records
    pub fn with_records(records: Vec<DnsRecord>) -> Self {
        let provider = Self::default();
        {
            let mut state = provider.state.lock().unwrap();
            state.zones.push(zone());
            state.records = records;
        }
        provider
    }

    /// Provider without any zone
    pub fn without_zones() -> Self {
        Self::default()
    }

    pub fn rejecting_token(self) -> Self {
        self.state.lock().unwrap().reject_token = true;
        self
    }

    /// Make token verification fail with a transport error
    pub fn unreachable_verification(self) -> Self {
        self.state.lock().unwrap().unreachable_verify = true;
        self
    }

    pub fn failing_listing(self) -> Self {
        self.state.lock().unwrap().fail_listing = true;
        self
    }

    /// Make create/update/delete fail for records of `record_type`
    pub fn failing_mutations_for(self, record_type: RecordType) -> Self {
        self.state.lock().unwrap().fail_mutations_for = Some(record_type);
        self
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<ProviderCall> {
        self.calls().into_iter().filter(ProviderCall::is_mutation).collect()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn records(&self) -> Vec<DnsRecord> {
        self.state.lock().unwrap().records.clone()
    }

    fn check_mutation(state: &ProviderState, record_type: Option<RecordType>) -> Result<()> {
        if record_type.is_some() && state.fail_mutations_for == record_type {
            return Err(Error::provider("mock", "injected failure"));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn verify_token(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::VerifyToken);
        if state.reject_token {
            return Err(Error::auth("token is disabled"));
        }
        if state.unreachable_verify {
            return Err(Error::http("connection reset by peer"));
        }
        Ok(())
    }

    async fn find_zone(&self, domain: &str) -> Result<Zone> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::FindZone(domain.to_string()));
        state
            .zones
            .iter()
            .find(|zone| zone.name == domain)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("Zone not found: {}", domain)))
    }

    async fn list_records(&self, zone: &Zone) -> Result<Vec<DnsRecord>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::ListRecords(zone.id.clone()));
        if state.fail_listing {
            return Err(Error::provider("mock", "listing failed"));
        }
        Ok(state.records.clone())
    }

    async fn create_record(&self, _zone: &Zone, record: &NewRecord) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::Create(record.clone()));
        Self::check_mutation(&state, Some(record.record_type))?;

        state.next_id += 1;
        let created = DnsRecord {
            id: format!("created-{}", state.next_id),
            record_type: record.record_type,
            name: record.name.clone(),
            content: record.content.clone(),
            proxied: record.proxied,
        };
        state.records.push(created);
        Ok(())
    }

    async fn update_record(
        &self,
        _zone: &Zone,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::Update {
            id: record_id.to_string(),
            update: update.clone(),
        });
        let record_type = state
            .records
            .iter()
            .find(|r| r.id == record_id)
            .map(|r| r.record_type);
        Self::check_mutation(&state, record_type)?;

        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or_else(|| Error::not_found(format!("DNS record not found: {}", record_id)))?;
        record.content = update.content.clone();
        record.proxied = update.proxied;
        Ok(())
    }

    async fn delete_record(&self, _zone: &Zone, record_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(ProviderCall::Delete(record_id.to_string()));
        let record_type = state
            .records
            .iter()
            .find(|r| r.id == record_id)
            .map(|r| r.record_type);
        Self::check_mutation(&state, record_type)?;

        state.records.retain(|r| r.id != record_id);
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An IP source with a fixed answer; `None` makes every lookup fail
#[derive(Clone)]
pub struct StaticIpSource {
    version: IpVersion,
    answer: Option<IpAddr>,
    call_count: Arc<AtomicUsize>,
}

impl StaticIpSource {
    pub fn new(version: IpVersion, answer: Option<IpAddr>) -> Self {
        Self {
            version,
            answer,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn v4(answer: Option<&str>) -> Self {
        Self::new(IpVersion::V4, answer.map(|a| a.parse().unwrap()))
    }

    pub fn v6(answer: Option<&str>) -> Self {
        Self::new(IpVersion::V6, answer.map(|a| a.parse().unwrap()))
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpSource for StaticIpSource {
    async fn current(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.answer
            .ok_or_else(|| Error::ip_source("connection refused"))
    }

    fn version(&self) -> IpVersion {
        self.version
    }
}

/// Machine identity with a fixed answer; `None` makes the lookup fail
pub struct StaticHostname(pub Option<&'static str>);

impl HostnameSource for StaticHostname {
    fn hostname(&self) -> Result<String> {
        self.0
            .map(str::to_string)
            .ok_or_else(|| Error::resolution("Failed to get hostname: permission denied"))
    }
}

pub fn zone() -> Zone {
    Zone {
        id: ZONE_ID.to_string(),
        name: DOMAIN.to_string(),
    }
}

pub fn record(id: &str, record_type: RecordType, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        record_type,
        name: HOSTNAME.to_string(),
        content: content.to_string(),
        proxied: false,
    }
}

/// Minimal configuration targeting [`HOSTNAME`]
pub fn minimal_config() -> RefreshConfig {
    let mut config = RefreshConfig::new(ProviderConfig::Cloudflare {
        api_token: "test-token".to_string(),
        dry_run: false,
    });
    config.target = TargetConfig {
        hostname: Some(HOSTNAME.to_string()),
        domain: None,
    };
    config
}

pub fn engine(
    provider: &MockDnsProvider,
    ipv4: &StaticIpSource,
    ipv6: &StaticIpSource,
    config: RefreshConfig,
) -> RefreshEngine {
    RefreshEngine::new(
        Box::new(provider.clone()),
        Box::new(ipv4.clone()),
        Box::new(ipv6.clone()),
        config,
    )
    .expect("engine construction succeeds")
}
