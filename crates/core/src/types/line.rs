//! Cart, display, and checkout line shapes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// One item in the cart.
///
/// ## Constraints
///
/// - At most one line per `item_id` within a cart
/// - `amount >= 1` for every line held by a cart
/// - `name` and `unit_cost` are fixed by the first add of the item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub item_id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub amount: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_cost: Decimal,
}

impl CartLine {
    /// Create a line with a quantity of one.
    #[must_use]
    pub const fn new(item_id: ItemId, name: Option<String>, unit_cost: Decimal) -> Self {
        Self {
            item_id,
            name,
            amount: 1,
            unit_cost,
        }
    }
}

/// A cart line with its derived line total.
///
/// Rows are a projection; they are recomputed on every read and never fed
/// back into the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    #[serde(flatten)]
    pub line: CartLine,
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
}

impl DisplayRow {
    /// The row key.
    #[must_use]
    pub const fn item_id(&self) -> &ItemId {
        &self.line.item_id
    }
}

impl From<CartLine> for DisplayRow {
    fn from(line: CartLine) -> Self {
        let line_total = line.unit_cost * Decimal::from(line.amount);
        Self { line, line_total }
    }
}

/// Wire shape of a purchase line sent to the remote order service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub item_id: ItemId,
    pub amount: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_cost: Decimal,
}

impl From<&CartLine> for CheckoutLine {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item_id.clone(),
            amount: i64::from(line.amount),
            unit_cost: line.unit_cost,
        }
    }
}
