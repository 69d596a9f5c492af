//! Commands that change state: checkout, item creation, event replay.

use std::path::Path;

use item_purchase::PurchaseApp;
use item_purchase::create_item::NewItemForm;
use item_purchase::events::UiEvent;
use item_purchase::session::RouteState;
use item_purchase_core::{AccountId, parse_price_str};
use serde_json::{Value, json};
use tracing::{info, warn};

use super::{CliError, context, print_json, print_notices, read_json};

/// One `--item ITEM_ID[:AMOUNT[:UNIT_COST]]` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemArg {
    item_id: String,
    amount: u32,
    unit_cost: String,
}

fn parse_item_arg(raw: &str) -> Result<ItemArg, CliError> {
    let invalid = || CliError::InvalidItem(raw.to_string());
    let mut parts = raw.splitn(3, ':');

    let item_id = parts
        .next()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(invalid)?;
    let amount = match parts.next().map(str::trim) {
        None | Some("") => 1,
        Some(n) => n.parse::<u32>().map_err(|_| invalid())?,
    };
    let unit_cost = parts.next().map(str::trim).unwrap_or_default();
    if parse_price_str(unit_cost).is_none() {
        return Err(invalid());
    }

    Ok(ItemArg {
        item_id: item_id.to_string(),
        amount,
        unit_cost: unit_cost.to_string(),
    })
}

/// Enter the account context, explicit or configured.
///
/// Initialization failures are already reported as notices; the app keeps
/// whatever loaded and stays usable.
async fn enter(app: &mut PurchaseApp, account: Option<String>) {
    if let Err(e) = app.connect().await {
        warn!(error = %e, "Initialization failed, continuing");
    }
    if let Some(id) = account {
        let route = RouteState::for_account(&AccountId::new(id));
        if let Err(e) = app.on_route(&route).await {
            warn!(error = %e, "Initialization failed, continuing");
        }
    }
}

/// Create a purchase from `--item` arguments or a prepared lines file.
///
/// # Errors
///
/// Returns an error if arguments are malformed, configuration is invalid, or
/// the checkout fails.
pub async fn checkout(
    account: Option<String>,
    items: &[String],
    lines: Option<&Path>,
) -> Result<(), CliError> {
    let parsed = items
        .iter()
        .map(|raw| parse_item_arg(raw))
        .collect::<Result<Vec<_>, _>>()?;
    let explicit: Option<Vec<Value>> = match lines {
        Some(path) => Some(read_json(path).await?),
        None => None,
    };

    let mut ctx = context()?;
    let result = run_checkout(&mut ctx.app, account, &parsed, explicit.as_deref()).await;
    print_notices(&ctx.notices);
    result
}

async fn run_checkout(
    app: &mut PurchaseApp,
    account: Option<String>,
    items: &[ItemArg],
    explicit: Option<&[Value]>,
) -> Result<(), CliError> {
    enter(app, account).await;

    for item in items {
        for _ in 0..item.amount {
            app.add_to_cart(&json!({
                "itemId": item.item_id,
                "price": item.unit_cost,
            }))?;
        }
    }
    if !app.cart().is_empty() {
        info!(
            lines = app.cart().len(),
            total = %app.cart_total(),
            "Cart ready"
        );
        print_json(&app.rows())?;
    }

    let purchase_id = app.checkout(explicit).await?;
    info!(purchase_id = %purchase_id, "Purchase created");
    Ok(())
}

/// Create a catalog item.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the form is invalid, or the
/// service fails.
pub async fn create_item(form: &NewItemForm) -> Result<(), CliError> {
    let mut ctx = context()?;
    let result = ctx.app.create_item(form).await;
    print_notices(&ctx.notices);
    let item_id = result?;
    print_json(&json!({ "id": item_id }))
}

/// Feed recorded UI events through the app, then print the cart.
///
/// Failing events are reported and replay continues.
///
/// # Errors
///
/// Returns an error if the file cannot be read or configuration is invalid.
pub async fn replay(path: &Path) -> Result<(), CliError> {
    let events: Vec<UiEvent> = read_json(path).await?;
    let mut ctx = context()?;

    if let Err(e) = ctx.app.connect().await {
        warn!(error = %e, "Initialization failed, replaying anyway");
    }
    for event in events {
        let name = event.name();
        if let Err(e) = ctx.app.dispatch(event).await {
            warn!(event = name, error = %e, "Event failed");
        }
    }

    print_notices(&ctx.notices);
    print_json(&ctx.app.rows())
}
