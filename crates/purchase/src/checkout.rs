//! Checkout: validate, submit once, clean up, navigate.
//!
//! The coordinator turns either an explicit line set (from the cart review
//! screen) or the cart itself into purchase lines, checks the preconditions
//! locally, and calls `createPurchase` exactly once. It never retries: the
//! remote call has no deduplication key, so a retry is always a new,
//! user-initiated checkout. The cart is cleared only after the service
//! confirms the purchase.

use item_purchase_core::{
    AccountId, CartLine, CheckoutLine, DisplayRow, Notice, PurchaseId, ValidationError,
};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::cart::CartStore;
use crate::navigation::NavigationResolver;
use crate::notify::Notifier;
use crate::payload::normalize_checkout_line;
use crate::remote::{ItemService, RemoteError};
use crate::view::ViewState;

/// Why a checkout did not produce a purchase.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// No account context is known; nothing was sent.
    #[error("No account context")]
    NoAccountContext,

    /// No line with an item id remained; nothing was sent.
    #[error("Nothing to check out")]
    EmptyCart,

    /// The purchase service failed.
    #[error("Purchase creation failed: {0}")]
    Remote(#[from] RemoteError),
}

impl CheckoutError {
    /// The single notice reported for this failure.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::NoAccountContext => Notice::warning(
                "No Account",
                ValidationError::NoAccountContext.to_string(),
            ),
            Self::EmptyCart => {
                Notice::error("Checkout error", ValidationError::EmptyCart.to_string())
            }
            Self::Remote(e) => Notice::error("Checkout error", e.user_message()),
        }
    }

    /// Whether the failure was caught before any remote call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::NoAccountContext | Self::EmptyCart)
    }
}

/// Anything that can be submitted as a purchase line.
pub trait CheckoutSource {
    /// The normalized line, or `None` when no item id is resolvable.
    fn to_checkout_line(&self) -> Option<CheckoutLine>;
}

impl CheckoutSource for Value {
    fn to_checkout_line(&self) -> Option<CheckoutLine> {
        normalize_checkout_line(self)
    }
}

impl CheckoutSource for CartLine {
    fn to_checkout_line(&self) -> Option<CheckoutLine> {
        if self.item_id.as_str().trim().is_empty() {
            return None;
        }
        Some(CheckoutLine::from(self))
    }
}

impl CheckoutSource for DisplayRow {
    fn to_checkout_line(&self) -> Option<CheckoutLine> {
        self.line.to_checkout_line()
    }
}

/// Purchase lines for a checkout.
///
/// Uses `explicit` when it is present and non-empty, the cart otherwise.
/// Lines without an item id are dropped.
#[must_use]
pub fn checkout_lines<L: CheckoutSource>(
    cart: &CartStore,
    explicit: Option<&[L]>,
) -> Vec<CheckoutLine> {
    match explicit {
        Some(lines) if !lines.is_empty() => lines
            .iter()
            .filter_map(CheckoutSource::to_checkout_line)
            .collect(),
        _ => cart
            .snapshot()
            .iter()
            .filter_map(CheckoutSource::to_checkout_line)
            .collect(),
    }
}

/// Runs checkouts against the purchase service.
pub struct CheckoutCoordinator<'a> {
    service: &'a dyn ItemService,
    navigation: NavigationResolver<'a>,
    notifier: &'a dyn Notifier,
}

impl<'a> CheckoutCoordinator<'a> {
    #[must_use]
    pub const fn new(
        service: &'a dyn ItemService,
        navigation: NavigationResolver<'a>,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            service,
            navigation,
            notifier,
        }
    }

    /// Check out the cart, or the explicit lines when given.
    ///
    /// On success the cart is cleared, the cart dialog closed, and the new
    /// purchase shown. On failure the cart is left untouched and exactly one
    /// notice is emitted.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NoAccountContext`] or
    /// [`CheckoutError::EmptyCart`] without calling the service, or
    /// [`CheckoutError::Remote`] when the service fails.
    #[instrument(skip_all, fields(account_id = ?account.map(AccountId::as_str)))]
    pub async fn checkout<L: CheckoutSource>(
        &self,
        account: Option<&AccountId>,
        cart: &mut CartStore,
        view: &mut ViewState,
        explicit: Option<&[L]>,
    ) -> Result<PurchaseId, CheckoutError> {
        let lines = checkout_lines(cart, explicit);

        match self.submit(account, &lines).await {
            Ok(purchase_id) => {
                info!(purchase_id = %purchase_id, "purchase created");
                cart.clear();
                view.cart_open = false;
                self.navigation.go_to(&purchase_id).await;
                Ok(purchase_id)
            }
            Err(e) => {
                warn!(error = %e, "checkout failed");
                self.notifier.notify(e.notice());
                Err(e)
            }
        }
    }

    async fn submit(
        &self,
        account: Option<&AccountId>,
        lines: &[CheckoutLine],
    ) -> Result<PurchaseId, CheckoutError> {
        let account = account.ok_or(CheckoutError::NoAccountContext)?;
        if lines.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        info!(account_id = %account, lines = lines.len(), "submitting purchase");
        Ok(self.service.create_purchase(account, lines).await?)
    }
}
