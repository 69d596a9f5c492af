//! Integration test support for Item Purchase.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p item-purchase-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_checkout` - Cart accumulation and checkout through UI events
//! - `navigation_fallback` - Record navigation tiers after checkout
//! - `session_context` - Account context changes and initialization
//! - `item_creation` - New item form to catalog refresh
//! - `rest_service` - The HTTP client against a local stub server
//!
//! Everything runs in-process: the app is wired to [`FakeItemService`] and
//! [`FakeNavigator`], and the HTTP client talks to [`stub::StubServer`].

pub mod stub;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use item_purchase::PurchaseApp;
use item_purchase::config::PurchaseConfig;
use item_purchase::navigation::{NavigationError, Navigator, RecordTarget};
use item_purchase::notify::NoticeBuffer;
use item_purchase::remote::{ItemService, RemoteError};
use item_purchase_core::{
    Account, AccountId, CheckoutLine, FilterOptions, Item, ItemId, NewItem, PurchaseId,
    SearchRequest,
};
use rust_decimal::Decimal;
use url::Url;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Fake item service
// =============================================================================

/// A remote call of [`ItemService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Call {
    ResolveAccount,
    CheckManagerRole,
    LoadFilterOptions,
    SearchCatalog,
    CreateItem,
    RefreshItemImage,
    CreatePurchase,
}

#[derive(Debug, Default)]
struct FakeState {
    accounts: BTreeMap<AccountId, Account>,
    is_manager: bool,
    filters: FilterOptions,
    items: Vec<Item>,
    images: BTreeMap<ItemId, String>,
    failures: BTreeMap<Call, RemoteError>,
    calls: Vec<Call>,
    searches: Vec<SearchRequest>,
    created: Vec<(NewItem, bool)>,
    purchases: Vec<(AccountId, Vec<CheckoutLine>)>,
}

/// In-memory item service that records every call.
#[derive(Debug, Default)]
pub struct FakeItemService {
    state: Mutex<FakeState>,
}

/// A catalog item with the fields the tests care about.
#[must_use]
pub fn item(id: &str, name: &str, price: Decimal, family: &str, item_type: &str) -> Item {
    Item {
        id: ItemId::new(id),
        name: name.to_string(),
        description: None,
        item_type: Some(item_type.to_string()),
        family: Some(family.to_string()),
        price: Some(price),
        image: None,
    }
}

/// Widget (Tools/Hardware, 9.99), Gadget (Tools/Electronics, 4.50),
/// Rake (Garden/Hardware, 12.50).
#[must_use]
pub fn sample_items() -> Vec<Item> {
    vec![
        item("I1", "Widget", Decimal::new(999, 2), "Tools", "Hardware"),
        item("I2", "Gadget", Decimal::new(450, 2), "Tools", "Electronics"),
        item("I3", "Rake", Decimal::new(1250, 2), "Garden", "Hardware"),
    ]
}

impl FakeItemService {
    /// A service with the sample catalog, one account `001A`, and the
    /// manager role granted.
    #[must_use]
    pub fn new() -> Self {
        let service = Self::default();
        {
            let mut state = lock(&service.state);
            state.is_manager = true;
            state.items = sample_items();
            state.filters = FilterOptions::new(BTreeMap::from([
                (
                    "Family__c".to_string(),
                    vec!["Garden".to_string(), "Tools".to_string()],
                ),
                (
                    "Type__c".to_string(),
                    vec!["Electronics".to_string(), "Hardware".to_string()],
                ),
            ]));
        }
        service.with_account("001A", "Acme Corp")
    }

    /// Register an account.
    #[must_use]
    pub fn with_account(self, id: &str, name: &str) -> Self {
        let account = Account {
            id: AccountId::new(id),
            name: name.to_string(),
            account_number: None,
            industry: None,
        };
        lock(&self.state)
            .accounts
            .insert(account.id.clone(), account);
        self
    }

    /// Set whether the user may manage the catalog.
    pub fn set_manager(&self, is_manager: bool) {
        lock(&self.state).is_manager = is_manager;
    }

    /// Image URL returned for an item by `refresh_item_image`.
    pub fn set_image(&self, item_id: &str, url: &str) {
        lock(&self.state)
            .images
            .insert(ItemId::new(item_id), url.to_string());
    }

    /// Make every subsequent `call` fail with `error`.
    pub fn fail(&self, call: Call, error: RemoteError) {
        lock(&self.state).failures.insert(call, error);
    }

    /// Make `call` succeed again.
    pub fn recover(&self, call: Call) {
        lock(&self.state).failures.remove(&call);
    }

    /// Number of times `call` was made.
    #[must_use]
    pub fn count(&self, call: Call) -> usize {
        lock(&self.state).calls.iter().filter(|c| **c == call).count()
    }

    /// Every call in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.state).calls.clone()
    }

    /// Every search request in order.
    #[must_use]
    pub fn searches(&self) -> Vec<SearchRequest> {
        lock(&self.state).searches.clone()
    }

    /// Every created item with its auto-image flag.
    #[must_use]
    pub fn created(&self) -> Vec<(NewItem, bool)> {
        lock(&self.state).created.clone()
    }

    /// Every submitted purchase.
    #[must_use]
    pub fn purchases(&self) -> Vec<(AccountId, Vec<CheckoutLine>)> {
        lock(&self.state).purchases.clone()
    }

    /// Record the call and return its scripted failure, if any.
    fn enter(&self, call: Call) -> Result<MutexGuard<'_, FakeState>, RemoteError> {
        let mut state = lock(&self.state);
        state.calls.push(call);
        if let Some(error) = state.failures.get(&call) {
            return Err(replay(error));
        }
        Ok(state)
    }
}

/// A copy of a scripted failure (`RemoteError` is not `Clone`).
fn replay(error: &RemoteError) -> RemoteError {
    match error {
        RemoteError::Service { status, body } => RemoteError::Service {
            status: *status,
            body: body.clone(),
        },
        other => RemoteError::message(500, other.user_message()),
    }
}

fn matches_search(item: &Item, request: &SearchRequest) -> bool {
    let text = request.search_text.trim().to_lowercase();
    let in_list = |list: &[String], value: Option<&String>| {
        list.is_empty() || value.is_some_and(|v| list.contains(v))
    };

    (text.is_empty() || item.name.to_lowercase().contains(&text))
        && in_list(&request.families, item.family.as_ref())
        && in_list(&request.types, item.item_type.as_ref())
}

#[async_trait]
impl ItemService for FakeItemService {
    async fn resolve_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<Account>, RemoteError> {
        let state = self.enter(Call::ResolveAccount)?;
        Ok(state.accounts.get(account_id).cloned())
    }

    async fn check_manager_role(&self) -> Result<bool, RemoteError> {
        let state = self.enter(Call::CheckManagerRole)?;
        Ok(state.is_manager)
    }

    async fn load_filter_options(&self) -> Result<FilterOptions, RemoteError> {
        let state = self.enter(Call::LoadFilterOptions)?;
        Ok(state.filters.clone())
    }

    async fn search_catalog(&self, request: &SearchRequest) -> Result<Vec<Item>, RemoteError> {
        let mut state = self.enter(Call::SearchCatalog)?;
        state.searches.push(request.clone());
        Ok(state
            .items
            .iter()
            .filter(|i| matches_search(i, request))
            .cloned()
            .collect())
    }

    async fn create_item(&self, item: &NewItem, auto_image: bool) -> Result<ItemId, RemoteError> {
        let mut state = self.enter(Call::CreateItem)?;
        let id = ItemId::new(format!("a01new{}", state.created.len() + 1));
        state.created.push((item.clone(), auto_image));
        state.items.push(Item {
            id: id.clone(),
            name: item.name.clone(),
            description: item.description.clone(),
            item_type: item.item_type.clone(),
            family: item.family.clone(),
            price: item.price,
            image: item.image.clone(),
        });
        Ok(id)
    }

    async fn refresh_item_image(&self, item_id: &ItemId) -> Result<Option<String>, RemoteError> {
        let state = self.enter(Call::RefreshItemImage)?;
        Ok(state.images.get(item_id).cloned())
    }

    async fn create_purchase(
        &self,
        account_id: &AccountId,
        lines: &[CheckoutLine],
    ) -> Result<PurchaseId, RemoteError> {
        let mut state = self.enter(Call::CreatePurchase)?;
        state.purchases.push((account_id.clone(), lines.to_vec()));
        Ok(PurchaseId::new(format!("a02xx{:04}", state.purchases.len())))
    }
}

// =============================================================================
// Fake navigator
// =============================================================================

/// How the fake host handles navigation requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostRouting {
    /// Direct navigation works.
    Router,
    /// No router; generated URLs work.
    UrlOnly,
    /// No router and no URL.
    NoUrl,
    /// No router and URL generation fails.
    Broken,
}

/// Navigator with scripted host behavior that records what it did.
#[derive(Debug)]
pub struct FakeNavigator {
    routing: HostRouting,
    navigated: Mutex<Vec<RecordTarget>>,
    opened: Mutex<Vec<Url>>,
}

impl FakeNavigator {
    #[must_use]
    pub const fn new(routing: HostRouting) -> Self {
        Self {
            routing,
            navigated: Mutex::new(Vec::new()),
            opened: Mutex::new(Vec::new()),
        }
    }

    /// Targets reached by direct navigation.
    #[must_use]
    pub fn navigated(&self) -> Vec<RecordTarget> {
        lock(&self.navigated).clone()
    }

    /// URLs opened after URL generation.
    #[must_use]
    pub fn opened(&self) -> Vec<Url> {
        lock(&self.opened).clone()
    }
}

#[async_trait]
impl Navigator for FakeNavigator {
    fn navigate(&self, target: &RecordTarget) -> Result<(), NavigationError> {
        if self.routing == HostRouting::Router {
            lock(&self.navigated).push(target.clone());
            Ok(())
        } else {
            Err(NavigationError::Failed("no router in this host".to_string()))
        }
    }

    async fn generate_url(&self, target: &RecordTarget) -> Result<Option<Url>, NavigationError> {
        match self.routing {
            HostRouting::Router | HostRouting::UrlOnly => {
                let url = Url::parse(&format!(
                    "https://org.test/lightning/r/{}/{}/{}",
                    target.object_api_name,
                    target.record_id,
                    target.action_name.as_str()
                ))?;
                Ok(Some(url))
            }
            HostRouting::NoUrl => Ok(None),
            HostRouting::Broken => Err(NavigationError::Failed("url service down".to_string())),
        }
    }

    fn open_url(&self, url: &Url) {
        lock(&self.opened).push(url.clone());
    }
}

// =============================================================================
// Harness
// =============================================================================

/// A [`PurchaseApp`] wired to fakes, with handles to inspect them.
pub struct Harness {
    pub app: PurchaseApp,
    pub service: Arc<FakeItemService>,
    pub navigator: Arc<FakeNavigator>,
    pub notices: Arc<NoticeBuffer>,
}

impl Harness {
    /// Default config, sample service, host with a router.
    #[must_use]
    pub fn new() -> Self {
        Self::with(
            PurchaseConfig::default(),
            FakeItemService::new(),
            HostRouting::Router,
        )
    }

    #[must_use]
    pub fn with(config: PurchaseConfig, service: FakeItemService, routing: HostRouting) -> Self {
        let service = Arc::new(service);
        let navigator = Arc::new(FakeNavigator::new(routing));
        let notices = Arc::new(NoticeBuffer::new());
        let app = PurchaseApp::new(
            config,
            service.clone(),
            navigator.clone(),
            notices.clone(),
        );

        Self {
            app,
            service,
            navigator,
            notices,
        }
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
