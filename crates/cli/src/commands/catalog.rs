//! Read-only catalog commands.

use item_purchase::catalog::FilterSelection;
use item_purchase::remote::ItemService;
use item_purchase_core::AccountId;
use tracing::info;

use super::{CliError, context, print_json};

/// Print the allowed filter values.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the service fails.
pub async fn filters() -> Result<(), CliError> {
    let ctx = context()?;
    let options = ctx.service.load_filter_options().await?;
    print_json(&options)
}

/// Search the catalog; empty filters match everything.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the service fails.
pub async fn search(text: String, family: String, item_type: String) -> Result<(), CliError> {
    let ctx = context()?;
    let request = FilterSelection { family, item_type }.to_request(text);

    let items = ctx.service.search_catalog(&request).await?;
    info!(count = items.len(), "Search completed");
    print_json(&items)
}

/// Look up an account.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the service fails.
pub async fn account(id: &str) -> Result<(), CliError> {
    let ctx = context()?;
    let account_id = AccountId::new(id);

    match ctx.service.resolve_account(&account_id).await? {
        Some(account) => print_json(&account),
        None => {
            info!(account_id = %account_id, "Account not found");
            print_json(&serde_json::Value::Null)
        }
    }
}
