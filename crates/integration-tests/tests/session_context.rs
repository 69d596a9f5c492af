//! Account context changes and (re)initialization.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use item_purchase::AppError;
use item_purchase::config::{CartRetention, PurchaseConfig};
use item_purchase::events::UiEvent;
use item_purchase::remote::RemoteError;
use item_purchase::session::{ContextState, RouteState};
use item_purchase_core::{AccountId, Severity};
use item_purchase_integration_tests::{Call, FakeItemService, Harness, HostRouting};
use serde_json::json;

fn route_event(account: &str) -> UiEvent {
    serde_json::from_value(json!({
        "type": "route-changed",
        "state": {"c__accountId": account}
    }))
    .unwrap()
}

#[tokio::test]
async fn test_first_route_initializes_in_order() {
    let mut h = Harness::new();

    h.app.dispatch(route_event("001A")).await.unwrap();

    assert_eq!(
        h.service.calls(),
        [
            Call::ResolveAccount,
            Call::CheckManagerRole,
            Call::LoadFilterOptions,
            Call::SearchCatalog,
        ]
    );
    let catalog = h.app.catalog();
    assert_eq!(catalog.account.as_ref().map(|a| a.name.as_str()), Some("Acme Corp"));
    assert!(catalog.is_manager);
    assert_eq!(catalog.filters.families(), ["Garden", "Tools"]);
    assert_eq!(catalog.items.len(), 3);
}

#[tokio::test]
async fn test_same_or_missing_context_does_nothing() {
    let mut h = Harness::new();
    h.app.dispatch(route_event("001A")).await.unwrap();
    let calls = h.service.calls().len();

    h.app.dispatch(route_event("001A")).await.unwrap();
    h.app
        .dispatch(UiEvent::RouteChanged {
            route: RouteState::default(),
        })
        .await
        .unwrap();

    assert_eq!(h.service.calls().len(), calls);
    assert_eq!(
        h.app.session().state(),
        &ContextState::Ready(AccountId::new("001A"))
    );
}

#[tokio::test]
async fn test_record_id_attribute_is_a_fallback() {
    let mut h = Harness::new();
    let route = RouteState {
        state: BTreeMap::new(),
        attributes: BTreeMap::from([("recordId".to_string(), "001A".to_string())]),
    };

    h.app.on_route(&route).await.unwrap();
    assert_eq!(h.app.account_id(), Some(&AccountId::new("001A")));
}

#[tokio::test]
async fn test_context_change_clears_cart_by_default() {
    let service = FakeItemService::new().with_account("001B", "Beta Ltd");
    let mut h = Harness::with(PurchaseConfig::default(), service, HostRouting::Router);
    h.app.dispatch(route_event("001A")).await.unwrap();
    h.app.add_to_cart(&json!({"itemId": "I1", "price": 9.99})).unwrap();

    h.app.dispatch(route_event("001B")).await.unwrap();

    assert!(h.app.cart().is_empty());
    assert_eq!(
        h.app.catalog().account.as_ref().map(|a| a.name.as_str()),
        Some("Beta Ltd")
    );
}

#[tokio::test]
async fn test_context_change_retains_cart_when_configured() {
    let config = PurchaseConfig {
        cart_retention: CartRetention::Retain,
        ..PurchaseConfig::default()
    };
    let mut h = Harness::with(config, FakeItemService::new(), HostRouting::Router);
    h.app.dispatch(route_event("001A")).await.unwrap();
    h.app.add_to_cart(&json!({"itemId": "I1", "price": 9.99})).unwrap();

    h.app.dispatch(route_event("001B")).await.unwrap();

    assert_eq!(h.app.cart().len(), 1);
    // Unknown account: context is still taken, the lookup just finds nothing.
    assert!(h.app.catalog().account.is_none());
    assert_eq!(h.app.account_id(), Some(&AccountId::new("001B")));
}

#[tokio::test]
async fn test_init_failure_reports_once_and_keeps_partial_state() {
    let service = FakeItemService::new();
    service.fail(
        Call::LoadFilterOptions,
        RemoteError::message(503, "Filters unavailable"),
    );
    let mut h = Harness::with(PurchaseConfig::default(), service, HostRouting::Router);

    let err = h.app.dispatch(route_event("001A")).await.unwrap_err();

    assert!(matches!(err, AppError::Remote(_)));
    assert_eq!(
        h.app.session().state(),
        &ContextState::Ready(AccountId::new("001A"))
    );
    assert!(h.app.catalog().account.is_some());
    assert!(h.app.catalog().is_manager);
    assert!(h.app.catalog().items.is_empty());
    assert_eq!(h.service.count(Call::SearchCatalog), 0);

    let notices = h.notices.snapshot();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Error);
    assert_eq!(notices[0].title, "Init error");
    assert_eq!(notices[0].message, "Filters unavailable");

    // No automatic retry; a later search still works.
    h.service.recover(Call::LoadFilterOptions);
    h.app
        .dispatch(UiEvent::SearchTextChanged {
            text: "rake".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(h.app.catalog().items.len(), 1);
    assert_eq!(h.service.count(Call::LoadFilterOptions), 1);
}

#[tokio::test]
async fn test_connect_without_context_skips_account_lookup() {
    let mut h = Harness::new();
    h.app.connect().await.unwrap();

    assert_eq!(h.service.count(Call::ResolveAccount), 0);
    assert_eq!(h.service.count(Call::SearchCatalog), 1);
    assert_eq!(h.app.session().state(), &ContextState::Uninitialized);
}

#[tokio::test]
async fn test_search_events_update_criteria() {
    let mut h = Harness::new();
    h.app.connect().await.unwrap();

    h.app
        .dispatch(
            serde_json::from_value(json!({
                "type": "search-requested",
                "text": "",
                "families": ["Tools"],
                "types": []
            }))
            .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(h.app.catalog().items.len(), 2);

    h.app
        .dispatch(UiEvent::FilterChanged {
            families: vec!["Tools".to_string()],
            types: vec!["Electronics".to_string()],
        })
        .await
        .unwrap();
    let names: Vec<&str> = h
        .app
        .catalog()
        .items
        .iter()
        .map(|i| i.name.as_str())
        .collect();
    assert_eq!(names, ["Gadget"]);

    // Search failures outside initialization keep the previous results.
    h.service.fail(Call::SearchCatalog, RemoteError::message(500, "down"));
    h.app
        .dispatch(UiEvent::SearchTextChanged {
            text: "zzz".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(h.app.catalog().search_text, "zzz");
    assert_eq!(h.app.catalog().items.len(), 1);
    assert!(h.notices.snapshot().is_empty());
}
