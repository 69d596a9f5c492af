//! Display rows derived from cart lines.

use std::collections::BTreeSet;

use item_purchase_core::{CartLine, DisplayRow, ItemId};
use rust_decimal::Decimal;

/// A user's explicit choice of rows, by item id.
///
/// An empty selection means the user narrowed nothing; callers treat that as
/// "all rows" (see [`narrow`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection(BTreeSet<ItemId>);

impl Selection {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn insert(&mut self, item_id: ItemId) -> bool {
        self.0.insert(item_id)
    }

    #[must_use]
    pub fn contains(&self, item_id: &ItemId) -> bool {
        self.0.contains(item_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<ItemId> for Selection {
    fn from_iter<I: IntoIterator<Item = ItemId>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Project cart lines into display rows, preserving order.
#[must_use]
pub fn project(lines: &[CartLine]) -> Vec<DisplayRow> {
    lines.iter().cloned().map(DisplayRow::from).collect()
}

/// Rows whose item id is selected, in their original order.
///
/// An empty selection yields no rows; falling back to every row is the
/// caller's decision.
#[must_use]
pub fn narrow(rows: &[DisplayRow], selection: &Selection) -> Vec<DisplayRow> {
    rows.iter()
        .filter(|row| selection.contains(row.item_id()))
        .cloned()
        .collect()
}

/// Sum of line totals.
#[must_use]
pub fn subtotal(rows: &[DisplayRow]) -> Decimal {
    rows.iter().map(|row| row.line_total).sum()
}

/// Total number of units across rows.
#[must_use]
pub fn item_count(rows: &[DisplayRow]) -> u64 {
    rows.iter().map(|row| u64::from(row.line.amount)).sum()
}
