//! Contract Test: Idempotency
//!
//! Constraints verified:
//! - A second run with the same addresses and no external change issues no
//!   create/update/delete
//! - A run after an address change issues exactly one update per family
//!
//! If this test fails, every scheduled run churns DNS records.

mod common;

use common::*;
use ddns_core::ReconcileOutcome;
use ddns_core::types::RecordType;

#[tokio::test]
async fn second_run_is_a_no_op() {
    let provider = MockDnsProvider::with_records(vec![]);
    let ipv4 = StaticIpSource::v4(Some("203.0.113.5"));
    let ipv6 = StaticIpSource::v6(Some("2001:db8::5"));
    let engine = engine(&provider, &ipv4, &ipv6, minimal_config());

    let first = engine.run(&StaticHostname(None)).await.unwrap();
    assert!(first.changed());
    assert_eq!(provider.mutations().len(), 2);

    let second = engine.run(&StaticHostname(None)).await.unwrap();
    assert!(!second.changed(), "Second run should not change anything");
    assert!(matches!(second.a, ReconcileOutcome::Unchanged { .. }));
    assert!(matches!(second.aaaa, ReconcileOutcome::Unchanged { .. }));
    assert_eq!(
        provider.mutations().len(),
        2,
        "Second run should not issue create/update/delete"
    );
}

#[tokio::test]
async fn deletion_is_idempotent() {
    let provider =
        MockDnsProvider::with_records(vec![record("aaaa-1", RecordType::Aaaa, "2001:db8::1")]);
    let ipv4 = StaticIpSource::v4(None);
    let ipv6 = StaticIpSource::v6(None);
    let engine = engine(&provider, &ipv4, &ipv6, minimal_config());

    engine.run(&StaticHostname(None)).await.unwrap();
    engine.run(&StaticHostname(None)).await.unwrap();

    assert_eq!(
        provider.mutations(),
        vec![ProviderCall::Delete("aaaa-1".to_string())]
    );
}

#[tokio::test]
async fn address_change_between_runs_updates_once() {
    let provider = MockDnsProvider::with_records(vec![record("a-1", RecordType::A, "203.0.113.5")]);
    let ipv6 = StaticIpSource::v6(None);

    let unchanged = StaticIpSource::v4(Some("203.0.113.5"));
    engine(&provider, &unchanged, &ipv6, minimal_config())
        .run(&StaticHostname(None))
        .await
        .unwrap();
    assert!(provider.mutations().is_empty());

    let moved = StaticIpSource::v4(Some("203.0.113.9"));
    let engine = engine(&provider, &moved, &ipv6, minimal_config());
    engine.run(&StaticHostname(None)).await.unwrap();
    engine.run(&StaticHostname(None)).await.unwrap();

    assert_eq!(provider.mutations().len(), 1, "One update for one change");
    assert_eq!(provider.records()[0].content, "203.0.113.9");
}
