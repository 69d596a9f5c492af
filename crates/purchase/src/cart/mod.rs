//! In-memory cart.
//!
//! The cart is an ordered list of lines keyed by item id. Adding an item
//! that is already present bumps its quantity; name and unit cost stay as
//! they were on the first add, so a later catalog price change never alters
//! a line the user already put in the cart. There is no per-line removal;
//! the whole cart is cleared after a committed checkout.

pub mod aggregate;

pub use aggregate::{Selection, item_count, narrow, project, subtotal};

use item_purchase_core::{CartLine, ItemId};
use rust_decimal::Decimal;
use tracing::debug;

/// Ordered cart lines, at most one per item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add one unit of an item.
    ///
    /// Appends a line with amount 1 for a new item; otherwise increments the
    /// existing line's amount and ignores `name` and `unit_cost`.
    pub fn add(&mut self, item_id: ItemId, name: Option<String>, unit_cost: Decimal) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.item_id == item_id) {
            line.amount = line.amount.saturating_add(1);
            debug!(item_id = %line.item_id, amount = line.amount, "cart line incremented");
            return;
        }

        debug!(item_id = %item_id, %unit_cost, "cart line added");
        self.lines.push(CartLine::new(item_id, name, unit_cost));
    }

    /// Empty the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Read-only view of the lines in insertion order.
    #[must_use]
    pub fn snapshot(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn get(&self, item_id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.item_id == item_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
