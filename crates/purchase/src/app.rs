//! The purchase app: owned state plus the operations the UI drives.
//!
//! All state lives in [`PurchaseApp`] and every mutation goes through its
//! `&mut self` methods. A checkout holds the exclusive borrow until the
//! purchase settles, so a second checkout cannot start while one is in
//! flight.

use std::sync::Arc;

use item_purchase_core::{
    AccountId, DisplayRow, Item, ItemId, Notice, PurchaseId, SearchRequest,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::cart::{CartStore, Selection, narrow, project, subtotal};
use crate::catalog::{CatalogState, FilterSelection};
use crate::checkout::CheckoutCoordinator;
use crate::config::{CartRetention, PurchaseConfig};
use crate::create_item::NewItemForm;
use crate::error::{AppError, Result};
use crate::events::UiEvent;
use crate::navigation::{NavigationResolver, Navigator};
use crate::notify::Notifier;
use crate::payload::AddRequest;
use crate::remote::ItemService;
use crate::session::{RouteState, SessionResolver};
use crate::view::ViewState;

/// Item purchase application state.
pub struct PurchaseApp {
    config: PurchaseConfig,
    service: Arc<dyn ItemService>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    session: SessionResolver,
    catalog: CatalogState,
    cart: CartStore,
    view: ViewState,
}

impl PurchaseApp {
    #[must_use]
    pub fn new(
        config: PurchaseConfig,
        service: Arc<dyn ItemService>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            service,
            navigator,
            notifier,
            session: SessionResolver::new(),
            catalog: CatalogState::new(),
            cart: CartStore::new(),
            view: ViewState::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &PurchaseConfig {
        &self.config
    }

    #[must_use]
    pub const fn session(&self) -> &SessionResolver {
        &self.session
    }

    #[must_use]
    pub const fn account_id(&self) -> Option<&AccountId> {
        self.session.account_id()
    }

    #[must_use]
    pub const fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn view(&self) -> &ViewState {
        &self.view
    }

    /// Cart rows for the review screen.
    #[must_use]
    pub fn rows(&self) -> Vec<DisplayRow> {
        project(self.cart.snapshot())
    }

    /// Sum of all cart line totals.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        subtotal(&self.rows())
    }

    /// Initialize once at startup.
    ///
    /// Uses the configured default account as the context when routing has
    /// not provided one yet.
    ///
    /// # Errors
    ///
    /// Returns the initialization failure after reporting it.
    #[instrument(skip(self))]
    pub async fn connect(&mut self) -> Result<()> {
        if let Some(default) = self.config.default_account.clone() {
            self.session.observe(Some(default));
        }
        let account = self.session.account_id().cloned();
        self.initialize(account.as_ref()).await
    }

    /// React to a route change; reinitializes when the account changed.
    ///
    /// # Errors
    ///
    /// Returns the reinitialization failure after reporting it.
    #[instrument(skip_all)]
    pub async fn on_route(&mut self, route: &RouteState) -> Result<()> {
        let had_context = self.session.account_id().is_some();
        let Some(account) = self.session.observe_route(route) else {
            return Ok(());
        };

        if had_context && self.config.cart_retention == CartRetention::ClearOnContextChange {
            info!(lines = self.cart.len(), "clearing cart for new account");
            self.cart.clear();
            self.view.cart_open = false;
        }
        self.initialize(Some(&account)).await
    }

    async fn initialize(&mut self, account: Option<&AccountId>) -> Result<()> {
        if let Err(e) = self.catalog.initialize(self.service.as_ref(), account).await {
            warn!(error = %e, "initialization failed");
            self.notifier
                .notify(Notice::error("Init error", e.user_message()));
            return Err(e.into());
        }
        Ok(())
    }

    /// Add one unit of the item described by `payload` to the cart.
    ///
    /// # Errors
    ///
    /// Returns a validation error, after reporting it, when the payload has
    /// no item id.
    pub fn add_to_cart(&mut self, payload: &Value) -> Result<()> {
        match AddRequest::from_payload(payload) {
            Ok(request) => {
                self.accept(request);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "add to cart rejected");
                self.notifier
                    .notify(Notice::error("Add to cart error", e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Add a loaded catalog item to the cart.
    ///
    /// # Errors
    ///
    /// Same as [`add_to_cart`](Self::add_to_cart).
    pub fn add_item(&mut self, item: &Item) -> Result<()> {
        if item.id.as_str().trim().is_empty() {
            return self.add_to_cart(&Value::Null);
        }
        self.accept(AddRequest {
            item_id: item.id.clone(),
            name: Some(item.name.clone()).filter(|n| !n.trim().is_empty()),
            unit_cost: item.price.unwrap_or_default(),
        });
        Ok(())
    }

    fn accept(&mut self, request: AddRequest) {
        self.cart
            .add(request.item_id, request.name, request.unit_cost);
        self.notifier
            .notify(Notice::success("Added", "Item added to cart"));
    }

    /// Check out the cart, or the explicit lines when given.
    ///
    /// # Errors
    ///
    /// Returns the checkout failure after reporting it; the cart is kept.
    #[instrument(skip_all)]
    pub async fn checkout(&mut self, explicit: Option<&[Value]>) -> Result<PurchaseId> {
        let coordinator = CheckoutCoordinator::new(
            self.service.as_ref(),
            NavigationResolver::new(self.navigator.as_ref(), self.notifier.as_ref()),
            self.notifier.as_ref(),
        );
        let purchase_id = coordinator
            .checkout(
                self.session.account_id(),
                &mut self.cart,
                &mut self.view,
                explicit,
            )
            .await?;
        Ok(purchase_id)
    }

    /// Check out the rows picked on the review screen.
    ///
    /// An empty selection checks out every row.
    ///
    /// # Errors
    ///
    /// Same as [`checkout`](Self::checkout).
    #[instrument(skip_all)]
    pub async fn checkout_selection(&mut self, selection: &Selection) -> Result<PurchaseId> {
        let rows = self.rows();
        let chosen = if selection.is_empty() {
            rows
        } else {
            narrow(&rows, selection)
        };

        let coordinator = CheckoutCoordinator::new(
            self.service.as_ref(),
            NavigationResolver::new(self.navigator.as_ref(), self.notifier.as_ref()),
            self.notifier.as_ref(),
        );
        let purchase_id = coordinator
            .checkout(
                self.session.account_id(),
                &mut self.cart,
                &mut self.view,
                Some(chosen.as_slice()),
            )
            .await?;
        Ok(purchase_id)
    }

    /// Create a catalog item from the new item form.
    ///
    /// The form is only read, so it stays as entered when creation fails.
    ///
    /// # Errors
    ///
    /// Returns the validation or remote failure after reporting it.
    #[instrument(skip_all, fields(name = %form.name))]
    pub async fn create_item(&mut self, form: &NewItemForm) -> Result<ItemId> {
        let created = match form.validate() {
            Ok(record) => self
                .service
                .create_item(&record, form.auto_image)
                .await
                .map_err(AppError::from),
            Err(e) => Err(e.into()),
        };

        match created {
            Ok(item_id) => {
                info!(item_id = %item_id, "item created");
                self.on_item_created(&item_id).await;
                Ok(item_id)
            }
            Err(e) => {
                warn!(error = %e, "item creation failed");
                self.notifier
                    .notify(Notice::error("Create item error", e.user_message()));
                Err(e)
            }
        }
    }

    /// Announce a new item, close the creation dialog and refresh results.
    pub async fn on_item_created(&mut self, item_id: &ItemId) {
        info!(item_id = %item_id, "refreshing catalog after item creation");
        self.notifier.notify(Notice::success(
            "Success",
            format!("Item created: {item_id}"),
        ));
        self.view.create_open = false;
        self.catalog.search(self.service.as_ref()).await;
    }

    /// Fetch a fresh image for a catalog item.
    ///
    /// # Errors
    ///
    /// Returns the remote failure after reporting it.
    pub async fn refresh_item_image(&mut self, item_id: &ItemId) -> Result<Option<String>> {
        match self
            .catalog
            .refresh_item_image(self.service.as_ref(), item_id)
            .await
        {
            Ok(image) => Ok(image),
            Err(e) => {
                self.notifier
                    .notify(Notice::error("Image error", e.user_message()));
                Err(e.into())
            }
        }
    }

    pub async fn search(&mut self, request: SearchRequest) {
        self.catalog
            .apply_search(self.service.as_ref(), request)
            .await;
    }

    pub async fn set_search_text(&mut self, text: String) {
        self.catalog
            .set_search_text(self.service.as_ref(), text)
            .await;
    }

    pub async fn set_filters(&mut self, families: Vec<String>, types: Vec<String>) {
        self.catalog
            .set_filters(self.service.as_ref(), families, types)
            .await;
    }

    pub async fn apply_filter_selection(&mut self, selection: &FilterSelection) {
        self.catalog
            .apply_selection(self.service.as_ref(), selection)
            .await;
    }

    pub fn show_details(&mut self, item: Item) {
        self.view.show_details(item);
    }

    pub fn close_details(&mut self) {
        self.view.close_details();
    }

    pub fn open_cart(&mut self) {
        self.view.cart_open = true;
    }

    pub fn close_cart(&mut self) {
        self.view.cart_open = false;
    }

    /// Open the new item dialog; only managers may create items.
    pub fn open_create_item(&mut self) {
        if self.catalog.is_manager {
            self.view.create_open = true;
        } else {
            warn!("create item requested without manager role");
        }
    }

    pub fn close_create_item(&mut self) {
        self.view.create_open = false;
    }

    /// Handle one UI event.
    ///
    /// # Errors
    ///
    /// Returns the failure of the operation the event triggered; it has
    /// already been reported as a notice.
    #[instrument(skip_all, fields(event = event.name()))]
    pub async fn dispatch(&mut self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::SearchRequested {
                text,
                families,
                types,
            } => {
                self.search(SearchRequest {
                    search_text: text,
                    families,
                    types,
                })
                .await;
            }
            UiEvent::SearchTextChanged { text } => self.set_search_text(text).await,
            UiEvent::FilterChanged { families, types } => {
                self.set_filters(families, types).await;
            }
            UiEvent::ItemAddRequested { payload } => self.add_to_cart(&payload)?,
            UiEvent::CheckoutRequested { explicit_lines } => {
                self.checkout(explicit_lines.as_deref()).await?;
            }
            UiEvent::ItemCreated { id } => self.on_item_created(&id).await,
            UiEvent::ShowDetailsRequested { item } => self.show_details(item),
            UiEvent::OpenCart => self.open_cart(),
            UiEvent::CloseCart => self.close_cart(),
            UiEvent::CloseDetails => self.close_details(),
            UiEvent::OpenCreateItem => self.open_create_item(),
            UiEvent::CloseCreateItem => self.close_create_item(),
            UiEvent::RouteChanged { route } => self.on_route(&route).await?,
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use item_purchase_core::{
        Account, CheckoutLine, FilterOptions, NewItem, Severity, ValidationError,
    };
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::checkout::CheckoutError;
    use crate::navigation::{NavigationError, RecordTarget};
    use crate::notify::NoticeBuffer;
    use crate::remote::RemoteError;

    #[derive(Default)]
    struct StubService {
        purchases: Mutex<usize>,
        searches: Mutex<usize>,
    }

    #[async_trait]
    impl ItemService for StubService {
        async fn resolve_account(&self, id: &AccountId) -> std::result::Result<Option<Account>, RemoteError> {
            Ok(Some(Account {
                id: id.clone(),
                name: "Acme".to_string(),
                account_number: None,
                industry: None,
            }))
        }
        async fn check_manager_role(&self) -> std::result::Result<bool, RemoteError> {
            Ok(true)
        }
        async fn load_filter_options(&self) -> std::result::Result<FilterOptions, RemoteError> {
            Ok(FilterOptions::default())
        }
        async fn search_catalog(
            &self,
            _: &SearchRequest,
        ) -> std::result::Result<Vec<Item>, RemoteError> {
            *self.searches.lock().unwrap() += 1;
            Ok(Vec::new())
        }
        async fn create_item(
            &self,
            _: &NewItem,
            _: bool,
        ) -> std::result::Result<ItemId, RemoteError> {
            Ok(ItemId::new("a01new"))
        }
        async fn refresh_item_image(
            &self,
            _: &ItemId,
        ) -> std::result::Result<Option<String>, RemoteError> {
            Ok(None)
        }
        async fn create_purchase(
            &self,
            _: &AccountId,
            _: &[CheckoutLine],
        ) -> std::result::Result<PurchaseId, RemoteError> {
            *self.purchases.lock().unwrap() += 1;
            Ok(PurchaseId::new("a02new"))
        }
    }

    struct NoRouter;

    #[async_trait]
    impl Navigator for NoRouter {
        fn navigate(&self, _: &RecordTarget) -> std::result::Result<(), NavigationError> {
            Err(NavigationError::Unsupported)
        }
        async fn generate_url(
            &self,
            _: &RecordTarget,
        ) -> std::result::Result<Option<Url>, NavigationError> {
            Ok(None)
        }
        fn open_url(&self, _: &Url) {}
    }

    fn app(config: PurchaseConfig) -> (PurchaseApp, Arc<StubService>, Arc<NoticeBuffer>) {
        let service = Arc::new(StubService::default());
        let notices = Arc::new(NoticeBuffer::new());
        let app = PurchaseApp::new(config, service.clone(), Arc::new(NoRouter), notices.clone());
        (app, service, notices)
    }

    #[tokio::test]
    async fn test_add_to_cart_notices() {
        let (mut app, _, notices) = app(PurchaseConfig::default());

        app.add_to_cart(&json!({"itemId": "I1", "name": "Widget", "price": 9.99}))
            .unwrap();
        let err = app.add_to_cart(&json!({"name": "Orphan"})).unwrap_err();

        assert!(matches!(err, AppError::Validation(ValidationError::MissingItemId)));
        assert_eq!(app.cart().len(), 1);
        let all = notices.snapshot();
        assert_eq!(all[0].title, "Added");
        assert_eq!(all[1].title, "Add to cart error");
        assert_eq!(all[1].message, "The position has no itemId.");
    }

    #[tokio::test]
    async fn test_checkout_without_context() {
        let (mut app, service, notices) = app(PurchaseConfig::default());
        app.add_to_cart(&json!({"itemId": "I1"})).unwrap();

        let err = app.checkout(None).await.unwrap_err();

        assert!(matches!(err, AppError::Checkout(CheckoutError::NoAccountContext)));
        assert_eq!(*service.purchases.lock().unwrap(), 0);
        assert_eq!(notices.count(Severity::Warning), 1);
        assert_eq!(app.cart().len(), 1);
    }

    #[tokio::test]
    async fn test_connect_uses_default_account_then_checkout() {
        let config = PurchaseConfig {
            default_account: Some(AccountId::new("001")),
            ..PurchaseConfig::default()
        };
        let (mut app, service, notices) = app(config);
        app.connect().await.unwrap();
        assert_eq!(app.account_id(), Some(&AccountId::new("001")));
        assert!(app.catalog().is_manager);

        app.add_to_cart(&json!({"itemId": "I1", "price": 2})).unwrap();
        app.open_cart();
        let purchase_id = app.checkout_selection(&Selection::new()).await.unwrap();

        assert_eq!(purchase_id.as_str(), "a02new");
        assert!(app.cart().is_empty());
        assert!(!app.view().cart_open);
        assert_eq!(*service.purchases.lock().unwrap(), 1);
        let last = notices.snapshot().pop().unwrap();
        assert_eq!(last.message, "ID: a02new");
    }

    #[tokio::test]
    async fn test_route_change_clears_cart_by_default() {
        let (mut app, _, _) = app(PurchaseConfig::default());
        app.on_route(&RouteState::for_account(&AccountId::new("001A")))
            .await
            .unwrap();
        app.add_to_cart(&json!({"itemId": "I1"})).unwrap();

        app.on_route(&RouteState::for_account(&AccountId::new("001A")))
            .await
            .unwrap();
        assert_eq!(app.cart().len(), 1);

        app.on_route(&RouteState::for_account(&AccountId::new("001B")))
            .await
            .unwrap();
        assert!(app.cart().is_empty());
    }

    #[tokio::test]
    async fn test_route_change_retains_cart_when_configured() {
        let config = PurchaseConfig {
            cart_retention: CartRetention::Retain,
            ..PurchaseConfig::default()
        };
        let (mut app, _, _) = app(config);
        app.on_route(&RouteState::for_account(&AccountId::new("001A")))
            .await
            .unwrap();
        app.add_to_cart(&json!({"itemId": "I1"})).unwrap();
        app.on_route(&RouteState::for_account(&AccountId::new("001B")))
            .await
            .unwrap();

        assert_eq!(app.cart().len(), 1);
        assert_eq!(app.account_id(), Some(&AccountId::new("001B")));
    }

    #[tokio::test]
    async fn test_create_item_closes_dialog_and_searches() {
        let (mut app, service, notices) = app(PurchaseConfig::default());
        app.connect().await.unwrap();
        app.open_create_item();
        assert!(app.view().create_open);
        let searches_before = *service.searches.lock().unwrap();

        let form = NewItemForm {
            name: "Rake".to_string(),
            ..NewItemForm::default()
        };
        let id = app.create_item(&form).await.unwrap();

        assert_eq!(id.as_str(), "a01new");
        assert!(!app.view().create_open);
        assert_eq!(*service.searches.lock().unwrap(), searches_before + 1);
        assert_eq!(
            notices.snapshot().pop().map(|n| n.message),
            Some("Item created: a01new".to_string())
        );
    }

    #[tokio::test]
    async fn test_create_item_invalid_form() {
        let (mut app, _, notices) = app(PurchaseConfig::default());
        let form = NewItemForm::default();

        let err = app.create_item(&form).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::MissingName)));
        assert_eq!(notices.count(Severity::Error), 1);
    }

    #[tokio::test]
    async fn test_dispatch_view_toggles() {
        let (mut app, _, _) = app(PurchaseConfig::default());
        app.dispatch(UiEvent::OpenCart).await.unwrap();
        assert!(app.view().cart_open);
        app.dispatch(UiEvent::CloseCart).await.unwrap();
        assert!(!app.view().cart_open);

        let item: Item = serde_json::from_value(json!({"Id": "I1", "Name": "Widget"})).unwrap();
        app.dispatch(UiEvent::ShowDetailsRequested { item })
            .await
            .unwrap();
        assert!(app.view().details_open());
        app.dispatch(UiEvent::CloseDetails).await.unwrap();
        assert!(!app.view().details_open());
    }

    #[tokio::test]
    async fn test_add_item_uses_record_fields() {
        let (mut app, _, _) = app(PurchaseConfig::default());
        let item: Item = serde_json::from_value(json!({
            "Id": "a01",
            "Name": "Rake",
            "Price__c": 12.5
        }))
        .unwrap();

        app.add_item(&item).unwrap();
        let line = app.cart().get(&ItemId::new("a01")).unwrap();
        assert_eq!(line.name.as_deref(), Some("Rake"));
        assert_eq!(line.unit_cost, Decimal::new(125, 1));
    }
}
