//! JSON/HTTP implementation of the item service.
//!
//! All endpoints live under `{base_url}/services/apexrest/item-purchase/`.
//! Filter options and search results are cached using `moka`; creating an
//! item or refreshing an image invalidates the cache so the next search sees
//! the change.

use std::sync::Arc;

use async_trait::async_trait;
use item_purchase_core::{
    Account, AccountId, CheckoutLine, ErrorBody, FilterOptions, Item, ItemId, NewItem,
    PurchaseId, SearchRequest,
};
use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::cache::{CacheKey, CacheValue};
use super::{CreateItemRequest, CreatePurchaseRequest, ItemService, RemoteError};
use crate::config::ItemServiceConfig;

/// Path of the service API relative to the configured base URL.
const API_ROOT: &str = "services/apexrest/item-purchase/";

/// Longest slice of a response body written to logs.
const LOG_BODY_LIMIT: usize = 500;

// =============================================================================
// RestItemService
// =============================================================================

/// Client for the remote item service.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct RestItemService {
    inner: Arc<RestItemServiceInner>,
}

struct RestItemServiceInner {
    client: reqwest::Client,
    api_root: Url,
    access_token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl RestItemService {
    /// Create a new item service client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the API root
    /// cannot be derived from the base URL.
    pub fn new(config: &ItemServiceConfig) -> Result<Self, RemoteError> {
        let cache = Cache::builder()
            .max_capacity(500)
            .time_to_live(config.cache_ttl)
            .build();

        let api_root = config.base_url.join(API_ROOT).map_err(|e| {
            RemoteError::message(0, format!("invalid base URL {}: {e}", config.base_url))
        })?;

        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(RestItemServiceInner {
                client,
                api_root,
                access_token: config.token().to_string(),
                cache,
            }),
        })
    }

    /// Build an endpoint URL from path segments (each segment is escaped).
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.api_root.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and return its status and body text.
    async fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String), RemoteError> {
        let response = request
            .bearer_auth(&self.inner.access_token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        Ok((status, text))
    }

    /// Send a request and decode a successful JSON response.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, RemoteError> {
        let (status, text) = self.send(request).await?;
        decode(status, &text)
    }

    fn get(&self, segments: &[&str]) -> RequestBuilder {
        self.inner.client.get(self.endpoint(segments))
    }

    fn post(&self, segments: &[&str]) -> RequestBuilder {
        self.inner.client.post(self.endpoint(segments))
    }
}

/// Turn a status and body into a decoded value or a structured error.
fn decode<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T, RemoteError> {
    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %text.chars().take(LOG_BODY_LIMIT).collect::<String>(),
            "Item service returned non-success status"
        );
        return Err(RemoteError::Service {
            status: status.as_u16(),
            body: ErrorBody::parse(text),
        });
    }

    serde_json::from_str(text).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %text.chars().take(LOG_BODY_LIMIT).collect::<String>(),
            "Failed to parse item service response"
        );
        RemoteError::Parse(e)
    })
}

#[async_trait]
impl ItemService for RestItemService {
    #[instrument(skip(self), fields(account_id = %account_id))]
    async fn resolve_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Account>, RemoteError> {
        let (status, text) = self
            .send(self.get(&["accounts", account_id.as_str()]))
            .await?;

        if status == StatusCode::NOT_FOUND {
            debug!("Account not found");
            return Ok(None);
        }
        decode(status, &text)
    }

    #[instrument(skip(self))]
    async fn check_manager_role(&self) -> Result<bool, RemoteError> {
        self.execute(self.get(&["permissions", "manager"])).await
    }

    #[instrument(skip(self))]
    async fn load_filter_options(&self) -> Result<FilterOptions, RemoteError> {
        if let Some(CacheValue::FilterOptions(options)) =
            self.inner.cache.get(&CacheKey::FilterOptions).await
        {
            debug!("Cache hit for filter options");
            return Ok(options);
        }

        let options: FilterOptions = self.execute(self.get(&["filters"])).await?;

        self.inner
            .cache
            .insert(
                CacheKey::FilterOptions,
                CacheValue::FilterOptions(options.clone()),
            )
            .await;

        Ok(options)
    }

    #[instrument(skip(self), fields(search_text = %request.search_text))]
    async fn search_catalog(&self, request: &SearchRequest) -> Result<Vec<Item>, RemoteError> {
        let cache_key = CacheKey::Search(request.clone());

        if let Some(CacheValue::Items(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for search");
            return Ok(items);
        }

        let items: Vec<Item> = self
            .execute(self.post(&["items", "search"]).json(request))
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Items(items.clone()))
            .await;

        Ok(items)
    }

    #[instrument(skip(self, item), fields(name = %item.name))]
    async fn create_item(&self, item: &NewItem, auto_image: bool) -> Result<ItemId, RemoteError> {
        let body = CreateItemRequest {
            rec: item,
            auto_image,
        };
        let id: ItemId = self.execute(self.post(&["items"]).json(&body)).await?;

        // New items must show up in the next search
        self.inner.cache.invalidate_all();

        Ok(id)
    }

    #[instrument(skip(self), fields(item_id = %item_id))]
    async fn refresh_item_image(&self, item_id: &ItemId) -> Result<Option<String>, RemoteError> {
        let image: Option<String> = self
            .execute(self.post(&["items", item_id.as_str(), "image"]))
            .await?;

        self.inner.cache.invalidate_all();

        Ok(image.filter(|url| !url.trim().is_empty()))
    }

    #[instrument(skip(self, lines), fields(account_id = %account_id, lines = lines.len()))]
    async fn create_purchase(
        &self,
        account_id: &AccountId,
        lines: &[CheckoutLine],
    ) -> Result<PurchaseId, RemoteError> {
        let body = CreatePurchaseRequest { account_id, lines };
        self.execute(self.post(&["purchases"]).json(&body)).await
    }
}
