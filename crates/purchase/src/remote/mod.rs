//! Remote item service seam.
//!
//! # Architecture
//!
//! - [`ItemService`] is the boundary to every remote call the purchase flow
//!   makes: account lookup, permission check, filter options, catalog search,
//!   item creation, image refresh, and purchase creation
//! - [`RestItemService`] implements it over JSON/HTTP with `reqwest`
//! - Filter options and search results are cached in memory via `moka`
//!
//! # Example
//!
//! ```rust,ignore
//! use item_purchase::remote::{ItemService, RestItemService};
//!
//! let service = RestItemService::new(&config)?;
//! let filters = service.load_filter_options().await?;
//! let items = service.search_catalog(&SearchRequest::default()).await?;
//! ```

mod cache;
mod rest;

pub use rest::RestItemService;

use async_trait::async_trait;
use item_purchase_core::{
    Account, AccountId, CheckoutLine, ErrorBody, FilterOptions, Item, ItemId, NewItem,
    PurchaseId, SearchRequest, UNKNOWN_ERROR,
};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur when calling the remote item service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Service error ({status}): {}", .body.user_message())]
    Service {
        /// HTTP status code.
        status: u16,
        /// Structured error payload.
        body: ErrorBody,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl RemoteError {
    /// A service failure carrying only a generic message.
    #[must_use]
    pub fn message(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status,
            body: ErrorBody::from_message(message),
        }
    }

    /// The message to show a user.
    ///
    /// Service failures use the error body precedence (field, page, generic);
    /// transport and parse failures fall back to their own description.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Service { body, .. } => body.user_message().to_string(),
            other => {
                let message = other.to_string();
                if message.trim().is_empty() {
                    UNKNOWN_ERROR.to_string()
                } else {
                    message
                }
            }
        }
    }
}

/// Request body of `createPurchase`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseRequest<'a> {
    pub account_id: &'a AccountId,
    pub lines: &'a [CheckoutLine],
}

/// Request body of `createItem`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest<'a> {
    pub rec: &'a NewItem,
    pub auto_image: bool,
}

/// The remote calls consumed by the purchase flow.
///
/// Every call either settles with its response or fails with a
/// [`RemoteError`]; no call is retried by the caller.
#[async_trait]
pub trait ItemService: Send + Sync {
    /// Look up an account; `None` when it does not exist.
    async fn resolve_account(&self, account_id: &AccountId)
    -> Result<Option<Account>, RemoteError>;

    /// Whether the current user may manage the catalog.
    async fn check_manager_role(&self) -> Result<bool, RemoteError>;

    /// Allowed values per filter field.
    async fn load_filter_options(&self) -> Result<FilterOptions, RemoteError>;

    /// Search the catalog.
    async fn search_catalog(&self, request: &SearchRequest) -> Result<Vec<Item>, RemoteError>;

    /// Create a catalog item, optionally looking up an image automatically.
    async fn create_item(&self, item: &NewItem, auto_image: bool) -> Result<ItemId, RemoteError>;

    /// Refresh an item's image; `None` when no image was found.
    async fn refresh_item_image(&self, item_id: &ItemId) -> Result<Option<String>, RemoteError>;

    /// Persist a purchase. Not idempotent: every call may create a record.
    async fn create_purchase(
        &self,
        account_id: &AccountId,
        lines: &[CheckoutLine],
    ) -> Result<PurchaseId, RemoteError>;
}
