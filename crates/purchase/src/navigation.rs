//! Navigation to a created purchase record.
//!
//! Reaching the record view is best effort and never fails the purchase:
//!
//! 1. Direct navigation through the host router
//! 2. Generate a URL for the record and open it in the same tab
//! 3. Tell the user the purchase id in a success notice
//!
//! [`resolve`] performs the first two tiers and reports which one worked;
//! [`NavigationResolver::go_to`] adds the third.

use async_trait::async_trait;
use item_purchase_core::{Notice, PurchaseId};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};
use url::Url;

use crate::notify::Notifier;

/// Object type of purchase records.
pub const PURCHASE_OBJECT: &str = "Purchase__c";

/// Errors reported by a [`Navigator`].
#[derive(Debug, Error)]
pub enum NavigationError {
    /// The host has no router for direct navigation.
    #[error("Direct navigation is not supported")]
    Unsupported,

    /// The router rejected the target.
    #[error("Navigation failed: {0}")]
    Failed(String),

    /// The target URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Page action of a record target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordAction {
    View,
    Edit,
}

impl RecordAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }
}

/// A record page to navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTarget {
    pub record_id: String,
    pub object_api_name: &'static str,
    pub action_name: RecordAction,
}

impl RecordTarget {
    /// The view page of a purchase.
    #[must_use]
    pub fn purchase(purchase_id: &PurchaseId) -> Self {
        Self {
            record_id: purchase_id.to_string(),
            object_api_name: PURCHASE_OBJECT,
            action_name: RecordAction::View,
        }
    }
}

/// Host navigation capabilities.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Navigate directly to the target.
    ///
    /// # Errors
    ///
    /// Returns an error when the host cannot navigate.
    fn navigate(&self, target: &RecordTarget) -> Result<(), NavigationError>;

    /// Generate a URL for the target, `None` when the host has none.
    async fn generate_url(&self, target: &RecordTarget) -> Result<Option<Url>, NavigationError>;

    /// Open a URL in the current tab.
    fn open_url(&self, url: &Url);
}

/// How the record was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Direct navigation succeeded.
    Direct,
    /// A generated URL was opened.
    ViaUrl(Url),
    /// Neither tier worked; the user only gets a notice.
    Degraded,
}

/// Try direct navigation, then URL generation.
///
/// Never fails: errors from either tier only move to the next one.
pub async fn resolve(navigator: &dyn Navigator, target: &RecordTarget) -> NavigationOutcome {
    match navigator.navigate(target) {
        Ok(()) => return NavigationOutcome::Direct,
        Err(e) => warn!(error = %e, "Navigate failed, will generate URL and open"),
    }

    match navigator.generate_url(target).await {
        Ok(Some(url)) => {
            navigator.open_url(&url);
            NavigationOutcome::ViaUrl(url)
        }
        Ok(None) => {
            warn!("No URL generated for record");
            NavigationOutcome::Degraded
        }
        Err(e) => {
            tracing::error!(error = %e, "URL generation failed");
            NavigationOutcome::Degraded
        }
    }
}

/// Navigates to created purchases, degrading to a notice.
pub struct NavigationResolver<'a> {
    navigator: &'a dyn Navigator,
    notifier: &'a dyn Notifier,
}

impl<'a> NavigationResolver<'a> {
    #[must_use]
    pub fn new(navigator: &'a dyn Navigator, notifier: &'a dyn Notifier) -> Self {
        Self {
            navigator,
            notifier,
        }
    }

    /// Show the purchase record by the best available means.
    #[instrument(skip(self), fields(purchase_id = %purchase_id))]
    pub async fn go_to(&self, purchase_id: &PurchaseId) -> NavigationOutcome {
        let target = RecordTarget::purchase(purchase_id);
        let outcome = resolve(self.navigator, &target).await;

        if outcome == NavigationOutcome::Degraded {
            self.notifier.notify(Notice::success(
                "Purchase created",
                format!("ID: {purchase_id}"),
            ));
        }
        info!(?outcome, "navigation resolved");
        outcome
    }
}

/// Navigator for hosts without a router: builds record URLs from a base URL
/// and hands them to a callback.
pub struct LinkNavigator<F> {
    base_url: Url,
    open: F,
}

impl<F> LinkNavigator<F>
where
    F: Fn(&Url) + Send + Sync,
{
    /// Create a navigator; `open` is called with every URL to show.
    #[must_use]
    pub const fn new(base_url: Url, open: F) -> Self {
        Self { base_url, open }
    }

    /// `{base}/lightning/r/{object}/{id}/{action}`
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn record_url(&self, target: &RecordTarget) -> Result<Url, NavigationError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| NavigationError::Failed(format!("cannot build path on {}", self.base_url)))?
            .pop_if_empty()
            .extend([
                "lightning",
                "r",
                target.object_api_name,
                target.record_id.as_str(),
                target.action_name.as_str(),
            ]);
        Ok(url)
    }
}

#[async_trait]
impl<F> Navigator for LinkNavigator<F>
where
    F: Fn(&Url) + Send + Sync,
{
    fn navigate(&self, _target: &RecordTarget) -> Result<(), NavigationError> {
        Err(NavigationError::Unsupported)
    }

    async fn generate_url(&self, target: &RecordTarget) -> Result<Option<Url>, NavigationError> {
        self.record_url(target).map(Some)
    }

    fn open_url(&self, url: &Url) {
        (self.open)(url);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use item_purchase_core::Severity;

    use super::*;
    use crate::notify::NoticeBuffer;

    /// Navigator with scripted tier results.
    struct ScriptedNavigator {
        direct: bool,
        url: Result<Option<&'static str>, ()>,
        opened: Mutex<Vec<String>>,
    }

    impl ScriptedNavigator {
        fn new(direct: bool, url: Result<Option<&'static str>, ()>) -> Self {
            Self {
                direct,
                url,
                opened: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Navigator for ScriptedNavigator {
        fn navigate(&self, _target: &RecordTarget) -> Result<(), NavigationError> {
            if self.direct {
                Ok(())
            } else {
                Err(NavigationError::Failed("no router".to_string()))
            }
        }

        async fn generate_url(
            &self,
            _target: &RecordTarget,
        ) -> Result<Option<Url>, NavigationError> {
            match self.url {
                Ok(Some(raw)) => Ok(Some(Url::parse(raw)?)),
                Ok(None) => Ok(None),
                Err(()) => Err(NavigationError::Failed("generate".to_string())),
            }
        }

        fn open_url(&self, url: &Url) {
            self.opened.lock().unwrap().push(url.to_string());
        }
    }

    #[tokio::test]
    async fn test_direct_navigation() {
        let navigator = ScriptedNavigator::new(true, Ok(Some("https://org.net/p")));
        let notices = NoticeBuffer::new();
        let outcome = NavigationResolver::new(&navigator, &notices)
            .go_to(&PurchaseId::new("P1"))
            .await;

        assert_eq!(outcome, NavigationOutcome::Direct);
        assert!(navigator.opened.lock().unwrap().is_empty());
        assert!(notices.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_to_generated_url() {
        let navigator = ScriptedNavigator::new(false, Ok(Some("https://org.net/p/P1")));
        let notices = NoticeBuffer::new();
        let outcome = NavigationResolver::new(&navigator, &notices)
            .go_to(&PurchaseId::new("P1"))
            .await;

        assert!(matches!(outcome, NavigationOutcome::ViaUrl(_)));
        assert_eq!(*navigator.opened.lock().unwrap(), ["https://org.net/p/P1"]);
        assert!(notices.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_no_url_degrades_to_single_success_notice() {
        let navigator = ScriptedNavigator::new(false, Ok(None));
        let notices = NoticeBuffer::new();
        let outcome = NavigationResolver::new(&navigator, &notices)
            .go_to(&PurchaseId::new("a02xx000001"))
            .await;

        assert_eq!(outcome, NavigationOutcome::Degraded);
        let all = notices.snapshot();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].severity, Severity::Success);
        assert!(all[0].message.contains("a02xx000001"));
    }

    #[tokio::test]
    async fn test_url_generation_error_degrades() {
        let navigator = ScriptedNavigator::new(false, Err(()));
        let notices = NoticeBuffer::new();
        let outcome = NavigationResolver::new(&navigator, &notices)
            .go_to(&PurchaseId::new("P1"))
            .await;

        assert_eq!(outcome, NavigationOutcome::Degraded);
        assert_eq!(notices.count(Severity::Success), 1);
    }

    #[tokio::test]
    async fn test_link_navigator_builds_record_url() {
        let opened = Mutex::new(Vec::new());
        let navigator = LinkNavigator::new(
            Url::parse("https://org.example.net/").unwrap(),
            |url: &Url| opened.lock().unwrap().push(url.to_string()),
        );
        let notices = NoticeBuffer::new();
        let outcome = NavigationResolver::new(&navigator, &notices)
            .go_to(&PurchaseId::new("a02xx"))
            .await;

        let expected = "https://org.example.net/lightning/r/Purchase__c/a02xx/view";
        assert_eq!(
            outcome,
            NavigationOutcome::ViaUrl(Url::parse(expected).unwrap())
        );
        assert_eq!(*opened.lock().unwrap(), [expected]);
    }
}
