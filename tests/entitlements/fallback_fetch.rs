//! Tests for resolve_with_fallback_fetch and restore_and_resolve.

#[path = "../common/mod.rs"]
mod common;
use common::*;

use std::sync::Arc;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn test_fetch_success_resolves_against_record() {
    let info = customer_with_active(&["premium"]);
    let purchases = Arc::new(CountingPurchases::new(info.clone()));
    let resolver = resolver_with(purchases.clone(), Environment::Production, SandboxOverrides::none());

    let (entitled, fetched) = resolver.resolve_with_fallback_fetch("premium").await;
    assert!(entitled);
    assert_eq!(fetched, Some(info));
    assert_eq!(purchases.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fetch_success_uses_registry() {
    let purchases = Arc::new(CountingPurchases::new(customer(Some("51"), None)));
    let resolver = resolver_with(purchases, Environment::Production, SandboxOverrides::none());
    resolver.register(premium_rule());

    let (entitled, fetched) = resolver.resolve_with_fallback_fetch("premium").await;
    assert!(entitled);
    assert!(fetched.is_some());
}

#[tokio::test]
async fn test_fetch_failure_in_production_is_not_entitled() {
    let purchases = Arc::new(FailingPurchases::new(StorefrontErrorCode::Network));
    let resolver = resolver_with(
        purchases.clone(),
        Environment::Production,
        SandboxOverrides::none().with_version("50"),
    );
    resolver.register(premium_rule());

    let (entitled, fetched) = resolver.resolve_with_fallback_fetch("premium").await;
    assert!(!entitled);
    assert!(fetched.is_none());
    // Single call, no retry
    assert_eq!(purchases.calls(), 1);
}

#[tokio::test]
async fn test_missing_customer_info_is_not_entitled() {
    let resolver = production_resolver();
    resolver.register(premium_rule());

    let (entitled, fetched) = resolver.resolve_with_fallback_fetch("premium").await;
    assert!(!entitled);
    assert!(fetched.is_none());
}

#[tokio::test]
async fn test_fetch_failure_in_sandbox_uses_version_override() {
    let purchases = Arc::new(FailingPurchases::new(StorefrontErrorCode::Network));
    let resolver = resolver_with(
        purchases,
        Environment::Sandbox,
        SandboxOverrides::none().with_version("50"),
    );
    resolver.register(premium_rule());

    let (entitled, fetched) = resolver.resolve_with_fallback_fetch("premium").await;
    assert!(entitled);
    assert!(fetched.is_none());
}

#[tokio::test]
async fn test_fetch_failure_in_sandbox_with_unmatched_override() {
    let purchases = Arc::new(FailingPurchases::new(StorefrontErrorCode::ServerError));
    let resolver = resolver_with(
        purchases,
        Environment::Sandbox,
        SandboxOverrides::none().with_version("99"),
    );
    resolver.register(premium_rule());

    let (entitled, _) = resolver.resolve_with_fallback_fetch("premium").await;
    assert!(!entitled);
}

#[tokio::test]
async fn test_fetch_failure_in_sandbox_without_version_override() {
    // A date override alone doesn't enable the offline path
    let purchases = Arc::new(FailingPurchases::new(StorefrontErrorCode::Network));
    let resolver = resolver_with(
        purchases,
        Environment::Sandbox,
        SandboxOverrides::none().with_purchase_date(date(2020, 1, 1)),
    );
    resolver.register(premium_rule());

    let (entitled, _) = resolver.resolve_with_fallback_fetch("premium").await;
    assert!(!entitled);
}

#[tokio::test]
async fn test_restore_and_resolve_uses_restored_record() {
    let purchases = Arc::new(
        CountingPurchases::new(customer(None, None)).with_restored(customer_with_active(&["premium"])),
    );
    let resolver = resolver_with(purchases.clone(), Environment::Production, SandboxOverrides::none());

    let (before, _) = resolver.resolve_with_fallback_fetch("premium").await;
    assert!(!before);

    let (after, info) = resolver.restore_and_resolve("premium").await;
    assert!(after);
    assert!(info.is_some_and(|i| i.is_entitlement_active("premium")));
    assert_eq!(purchases.restores.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_restore_failure_falls_back_like_fetch() {
    let purchases = Arc::new(FailingPurchases::new(StorefrontErrorCode::Unauthorized));
    let resolver = resolver_with(
        purchases.clone(),
        Environment::Sandbox,
        SandboxOverrides::none().with_version("51"),
    );
    resolver.register(premium_rule());

    let (entitled, info) = resolver.restore_and_resolve("premium").await;
    assert!(entitled);
    assert!(info.is_none());
    // Default restore delegates to a single customer_info call
    assert_eq!(purchases.calls(), 1);
}
