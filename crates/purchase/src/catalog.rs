//! Catalog browsing state: search criteria, filter options, results.

use item_purchase_core::{Account, AccountId, FilterOptions, Item, ItemId, SearchRequest};
use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::remote::{ItemService, RemoteError};

/// A filter form selection: one value per field, empty meaning "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub family: String,
    pub item_type: String,
}

impl FilterSelection {
    fn single(value: &str) -> Vec<String> {
        let value = value.trim();
        if value.is_empty() {
            Vec::new()
        } else {
            vec![value.to_string()]
        }
    }

    /// Selected families, empty for "all".
    #[must_use]
    pub fn families(&self) -> Vec<String> {
        Self::single(&self.family)
    }

    /// Selected types, empty for "all".
    #[must_use]
    pub fn types(&self) -> Vec<String> {
        Self::single(&self.item_type)
    }

    /// The search request for this selection and `search_text`.
    #[must_use]
    pub fn to_request(&self, search_text: impl Into<String>) -> SearchRequest {
        SearchRequest {
            search_text: search_text.into(),
            families: self.families(),
            types: self.types(),
        }
    }
}

/// Everything the catalog view shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogState {
    pub search_text: String,
    pub families: Vec<String>,
    pub types: Vec<String>,
    pub filters: FilterOptions,
    pub items: Vec<Item>,
    pub is_manager: bool,
    pub account: Option<Account>,
}

impl CatalogState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current search criteria.
    #[must_use]
    pub fn request(&self) -> SearchRequest {
        SearchRequest {
            search_text: self.search_text.clone(),
            families: self.families.clone(),
            types: self.types.clone(),
        }
    }

    /// Load account, permissions, filters, and initial results in order.
    ///
    /// Stops at the first failure; whatever was loaded before it is kept.
    /// The account lookup is skipped when no account is known.
    ///
    /// # Errors
    ///
    /// Returns the first remote failure.
    #[instrument(skip(self, service), fields(account_id = ?account.map(AccountId::as_str)))]
    pub async fn initialize(
        &mut self,
        service: &dyn ItemService,
        account: Option<&AccountId>,
    ) -> Result<(), RemoteError> {
        if let Some(account_id) = account {
            self.account = service.resolve_account(account_id).await?;
            if self.account.is_none() {
                warn!(account_id = %account_id, "account not found");
            }
        }

        self.is_manager = service.check_manager_role().await?;
        self.filters = service.load_filter_options().await?;
        self.items = service.search_catalog(&self.request()).await?;

        info!(
            items = self.items.len(),
            is_manager = self.is_manager,
            "catalog initialized"
        );
        Ok(())
    }

    /// Run the current search, replacing results on success.
    ///
    /// Failures are logged and the previous results kept.
    pub async fn search(&mut self, service: &dyn ItemService) {
        let request = self.request();
        match service.search_catalog(&request).await {
            Ok(items) => {
                info!(items = items.len(), "search completed");
                self.items = items;
            }
            Err(e) => warn!(error = %e, "search failed, keeping previous results"),
        }
    }

    /// Replace text and filters, then search.
    pub async fn apply_search(&mut self, service: &dyn ItemService, request: SearchRequest) {
        self.search_text = request.search_text;
        self.families = request.families;
        self.types = request.types;
        self.search(service).await;
    }

    /// Replace the text only, then search.
    pub async fn set_search_text(&mut self, service: &dyn ItemService, text: String) {
        self.search_text = text;
        self.search(service).await;
    }

    /// Replace the filters only, then search.
    pub async fn set_filters(
        &mut self,
        service: &dyn ItemService,
        families: Vec<String>,
        types: Vec<String>,
    ) {
        self.families = families;
        self.types = types;
        self.search(service).await;
    }

    /// Apply a filter form selection, then search.
    pub async fn apply_selection(&mut self, service: &dyn ItemService, selection: &FilterSelection) {
        self.set_filters(service, selection.families(), selection.types())
            .await;
    }

    /// Ask the service for a fresh image and store it on the matching item.
    ///
    /// Returns the new image URL when one was returned.
    ///
    /// # Errors
    ///
    /// Returns the remote failure.
    #[instrument(skip(self, service), fields(item_id = %item_id))]
    pub async fn refresh_item_image(
        &mut self,
        service: &dyn ItemService,
        item_id: &ItemId,
    ) -> Result<Option<String>, RemoteError> {
        let image = service.refresh_item_image(item_id).await?;
        if let Some(url) = &image {
            if let Some(item) = self.items.iter_mut().find(|i| &i.id == item_id) {
                item.image = Some(url.clone());
            }
        }
        Ok(image)
    }

    /// Find a loaded item by id.
    #[must_use]
    pub fn item(&self, item_id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|i| &i.id == item_id)
    }
}
