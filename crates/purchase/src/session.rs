//! Account context tracking.
//!
//! The host tells the app which account it was opened from through routing
//! state (`c__accountId`) or a page attribute (`recordId`). The resolver
//! turns the stream of route changes into "context changed, reinitialize"
//! decisions.

use std::collections::BTreeMap;

use item_purchase_core::AccountId;
use serde::Deserialize;
use tracing::{debug, info};

/// Routing state parameter carrying the account id.
pub const ROUTE_ACCOUNT_PARAM: &str = "c__accountId";
/// Page attribute carrying the record id of the hosting page.
pub const RECORD_ID_ATTRIBUTE: &str = "recordId";

/// What the host knows about the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouteState {
    /// Routing state parameters.
    pub state: BTreeMap<String, String>,
    /// Attributes of the hosting page.
    pub attributes: BTreeMap<String, String>,
}

impl RouteState {
    /// Route with only an account routing parameter.
    #[must_use]
    pub fn for_account(account_id: &AccountId) -> Self {
        Self {
            state: BTreeMap::from([(ROUTE_ACCOUNT_PARAM.to_string(), account_id.to_string())]),
            attributes: BTreeMap::new(),
        }
    }

    /// The account id this route points at, routing state first.
    #[must_use]
    pub fn candidate(&self) -> Option<AccountId> {
        [
            self.state.get(ROUTE_ACCOUNT_PARAM),
            self.attributes.get(RECORD_ID_ATTRIBUTE),
        ]
        .into_iter()
        .flatten()
        .map(|raw| raw.trim())
        .find(|raw| !raw.is_empty())
        .map(AccountId::from)
    }
}

/// Context state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContextState {
    #[default]
    Uninitialized,
    Ready(AccountId),
}

/// Tracks the active account context.
#[derive(Debug, Clone, Default)]
pub struct SessionResolver {
    state: ContextState,
}

impl SessionResolver {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: ContextState::Uninitialized,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &ContextState {
        &self.state
    }

    /// The active account, if any.
    #[must_use]
    pub const fn account_id(&self) -> Option<&AccountId> {
        match &self.state {
            ContextState::Ready(id) => Some(id),
            ContextState::Uninitialized => None,
        }
    }

    /// Record a candidate context.
    ///
    /// Returns the new context when it differs from the current one and the
    /// caller must reinitialize; `None` when absent or unchanged.
    pub fn observe(&mut self, candidate: Option<AccountId>) -> Option<AccountId> {
        let candidate = candidate?;
        if self.account_id() == Some(&candidate) {
            debug!(account_id = %candidate, "context unchanged");
            return None;
        }

        info!(account_id = %candidate, "account context changed");
        self.state = ContextState::Ready(candidate.clone());
        Some(candidate)
    }

    /// [`observe`](Self::observe) the candidate of a route.
    pub fn observe_route(&mut self, route: &RouteState) -> Option<AccountId> {
        self.observe(route.candidate())
    }
}
