//! Showing the created purchase across host capabilities.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;

use item_purchase::config::PurchaseConfig;
use item_purchase::navigation::{
    LinkNavigator, NavigationOutcome, NavigationResolver, RecordTarget, resolve,
};
use item_purchase::notify::NoticeBuffer;
use item_purchase::session::RouteState;
use item_purchase_core::{AccountId, PurchaseId, Severity};
use item_purchase_integration_tests::{FakeItemService, FakeNavigator, Harness, HostRouting};
use serde_json::json;
use url::Url;

async fn checkout_with(routing: HostRouting) -> Harness {
    let mut h = Harness::with(PurchaseConfig::default(), FakeItemService::new(), routing);
    h.app
        .on_route(&RouteState::for_account(&AccountId::new("001A")))
        .await
        .unwrap();
    h.app.add_to_cart(&json!({"itemId": "I1", "price": 9.99})).unwrap();
    h.notices.drain();

    h.app.checkout(None).await.unwrap();
    h
}

#[tokio::test]
async fn test_router_host_navigates_directly() {
    let h = checkout_with(HostRouting::Router).await;

    assert_eq!(h.navigator.navigated().len(), 1);
    assert!(h.navigator.opened().is_empty());
    assert!(h.notices.snapshot().is_empty());
}

#[tokio::test]
async fn test_url_only_host_opens_generated_url() {
    let h = checkout_with(HostRouting::UrlOnly).await;

    assert!(h.navigator.navigated().is_empty());
    let opened: Vec<String> = h.navigator.opened().iter().map(Url::to_string).collect();
    assert_eq!(
        opened,
        ["https://org.test/lightning/r/Purchase__c/a02xx0001/view"]
    );
    assert!(h.notices.snapshot().is_empty());
}

#[tokio::test]
async fn test_no_url_host_gets_single_success_notice() {
    let h = checkout_with(HostRouting::NoUrl).await;

    let notices = h.notices.snapshot();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Success);
    assert!(notices[0].message.contains("a02xx0001"));
    // Navigation trouble never undoes the purchase.
    assert!(h.app.cart().is_empty());
}

#[tokio::test]
async fn test_broken_host_degrades_without_error() {
    let h = checkout_with(HostRouting::Broken).await;

    assert_eq!(h.notices.count(Severity::Success), 1);
    assert_eq!(h.notices.count(Severity::Error), 0);
    assert_eq!(h.service.purchases().len(), 1);
}

#[tokio::test]
async fn test_resolve_reports_tier_without_notices() {
    let target = RecordTarget::purchase(&PurchaseId::new("P9"));

    let outcome = resolve(&FakeNavigator::new(HostRouting::Router), &target).await;
    assert_eq!(outcome, NavigationOutcome::Direct);

    let outcome = resolve(&FakeNavigator::new(HostRouting::UrlOnly), &target).await;
    assert!(matches!(outcome, NavigationOutcome::ViaUrl(url) if url.path().ends_with("/P9/view")));

    let outcome = resolve(&FakeNavigator::new(HostRouting::NoUrl), &target).await;
    assert_eq!(outcome, NavigationOutcome::Degraded);
}

#[tokio::test]
async fn test_link_navigator_under_base_path() {
    let opened = Mutex::new(Vec::new());
    let navigator = LinkNavigator::new(
        Url::parse("https://org.example.net/sandbox/").unwrap(),
        |url: &Url| opened.lock().unwrap().push(url.to_string()),
    );
    let notices = NoticeBuffer::new();

    let outcome = NavigationResolver::new(&navigator, &notices)
        .go_to(&PurchaseId::new("a02B"))
        .await;

    assert!(matches!(outcome, NavigationOutcome::ViaUrl(_)));
    assert_eq!(
        *opened.lock().unwrap(),
        ["https://org.example.net/sandbox/lightning/r/Purchase__c/a02B/view"]
    );
    assert!(notices.snapshot().is_empty());
}
