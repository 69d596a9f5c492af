//! Events raised by the UI and consumed by [`PurchaseApp::dispatch`].
//!
//! [`PurchaseApp::dispatch`]: crate::PurchaseApp::dispatch

use item_purchase_core::{Item, ItemId};
use serde::Deserialize;
use serde_json::Value;

use crate::session::RouteState;

/// A UI event.
///
/// Deserializes from `{"type": "<kebab-case name>", ...fields}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum UiEvent {
    /// Search with new text and filters.
    SearchRequested {
        #[serde(default)]
        text: String,
        #[serde(default)]
        families: Vec<String>,
        #[serde(default)]
        types: Vec<String>,
    },
    /// Search text edited.
    SearchTextChanged {
        #[serde(default)]
        text: String,
    },
    /// Filters changed.
    FilterChanged {
        #[serde(default)]
        families: Vec<String>,
        #[serde(default)]
        types: Vec<String>,
    },
    /// Add an item to the cart; the payload shape varies by origin.
    ItemAddRequested { payload: Value },
    /// Check out, optionally with lines chosen on the review screen.
    CheckoutRequested {
        #[serde(default, rename = "explicitLines")]
        explicit_lines: Option<Vec<Value>>,
    },
    /// A new item was created elsewhere.
    ItemCreated { id: ItemId },
    ShowDetailsRequested { item: Item },
    OpenCart,
    CloseCart,
    CloseDetails,
    OpenCreateItem,
    CloseCreateItem,
    /// The host page or its routing state changed.
    RouteChanged {
        #[serde(flatten)]
        route: RouteState,
    },
}

impl UiEvent {
    /// The event name as the UI raises it.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SearchRequested { .. } => "search-requested",
            Self::SearchTextChanged { .. } => "search-text-changed",
            Self::FilterChanged { .. } => "filter-changed",
            Self::ItemAddRequested { .. } => "item-add-requested",
            Self::CheckoutRequested { .. } => "checkout-requested",
            Self::ItemCreated { .. } => "item-created",
            Self::ShowDetailsRequested { .. } => "show-details-requested",
            Self::OpenCart => "open-cart",
            Self::CloseCart => "close-cart",
            Self::CloseDetails => "close-details",
            Self::OpenCreateItem => "open-create-item",
            Self::CloseCreateItem => "close-create-item",
            Self::RouteChanged { .. } => "route-changed",
        }
    }
}
