//! Resolution of ids, names, prices, and quantities from loose payloads.
//!
//! Events from the catalog and the cart review screen do not share one
//! shape: an item id may sit in `itemId`, `id`, `Id`, or a nested `item`
//! record. Each field is resolved by an ordered list of [`Strategy`]s; the
//! first strategy that yields a usable value wins.

use item_purchase_core::{CheckoutLine, ItemId, ValidationError, parse_price, parse_quantity};
use rust_decimal::Decimal;
use serde_json::Value;

/// One way of locating a value inside a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    /// JSON pointer to the candidate value (e.g. `/item/Id`).
    pub pointer: &'static str,
}

impl Strategy {
    const fn at(pointer: &'static str) -> Self {
        Self { pointer }
    }

    /// The candidate value, if present and not null.
    #[must_use]
    pub fn locate<'a>(&self, payload: &'a Value) -> Option<&'a Value> {
        payload.pointer(self.pointer).filter(|v| !v.is_null())
    }

    /// The candidate as a non-empty string (numbers are rendered).
    #[must_use]
    pub fn text(&self, payload: &Value) -> Option<String> {
        match self.locate(payload)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Item id locations for add-to-cart payloads.
pub const ADD_ITEM_ID: &[Strategy] = &[
    Strategy::at("/itemId"),
    Strategy::at("/id"),
    Strategy::at("/Id"),
    Strategy::at("/item/Id"),
];

/// Item id locations for checkout lines.
pub const CHECKOUT_ITEM_ID: &[Strategy] = &[
    Strategy::at("/itemId"),
    Strategy::at("/Id"),
    Strategy::at("/id"),
    Strategy::at("/item/Id"),
];

/// Display name locations.
pub const ITEM_NAME: &[Strategy] = &[Strategy::at("/name"), Strategy::at("/item/Name")];

/// Price locations for add-to-cart payloads.
pub const ADD_PRICE: &[Strategy] = &[Strategy::at("/price"), Strategy::at("/item/Price__c")];

/// Quantity location for checkout lines.
pub const CHECKOUT_AMOUNT: &[Strategy] = &[Strategy::at("/amount")];

/// Unit cost location for checkout lines.
pub const CHECKOUT_UNIT_COST: &[Strategy] = &[Strategy::at("/unitCost")];

/// First non-empty string found by the strategies.
#[must_use]
pub fn first_text(payload: &Value, strategies: &[Strategy]) -> Option<String> {
    strategies.iter().find_map(|s| s.text(payload))
}

/// First present value found by the strategies.
#[must_use]
pub fn first_value<'a>(payload: &'a Value, strategies: &[Strategy]) -> Option<&'a Value> {
    strategies.iter().find_map(|s| s.locate(payload))
}

/// A resolved add-to-cart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    pub item_id: ItemId,
    pub name: Option<String>,
    pub unit_cost: Decimal,
}

impl AddRequest {
    /// Resolve an add-to-cart payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingItemId`] when no strategy yields an
    /// item id.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let item_id = first_text(payload, ADD_ITEM_ID)
            .map(ItemId::from)
            .ok_or(ValidationError::MissingItemId)?;
        let name = first_text(payload, ITEM_NAME);
        let unit_cost = first_value(payload, ADD_PRICE).map_or(Decimal::ZERO, parse_price);

        Ok(Self {
            item_id,
            name,
            unit_cost,
        })
    }
}

/// Normalize one loosely-shaped checkout line.
///
/// Returns `None` when no item id can be resolved; amount and unit cost
/// default to zero when absent or unparseable.
#[must_use]
pub fn normalize_checkout_line(payload: &Value) -> Option<CheckoutLine> {
    let item_id = first_text(payload, CHECKOUT_ITEM_ID).map(ItemId::from)?;
    let amount = first_value(payload, CHECKOUT_AMOUNT).map_or(0, parse_quantity);
    let unit_cost = first_value(payload, CHECKOUT_UNIT_COST).map_or(Decimal::ZERO, parse_price);

    Some(CheckoutLine {
        item_id,
        amount,
        unit_cost,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_add_request_from_tile_payload() {
        let request = AddRequest::from_payload(&json!({
            "itemId": "I1",
            "name": "Widget",
            "price": 9.99
        }))
        .unwrap();

        assert_eq!(request.item_id.as_str(), "I1");
        assert_eq!(request.name.as_deref(), Some("Widget"));
        assert_eq!(request.unit_cost, Decimal::new(999, 2));
    }

    #[test]
    fn test_add_request_id_precedence() {
        let request = AddRequest::from_payload(&json!({
            "id": "from-id",
            "Id": "from-Id",
            "item": {"Id": "nested"}
        }))
        .unwrap();
        assert_eq!(request.item_id.as_str(), "from-id");

        let request = AddRequest::from_payload(&json!({"itemId": "", "Id": "from-Id"})).unwrap();
        assert_eq!(request.item_id.as_str(), "from-Id");
    }

    #[test]
    fn test_add_request_nested_record() {
        let request = AddRequest::from_payload(&json!({
            "item": {"Id": "a01", "Name": "Rake", "Price__c": "12,50"}
        }))
        .unwrap();

        assert_eq!(request.item_id.as_str(), "a01");
        assert_eq!(request.name.as_deref(), Some("Rake"));
        assert_eq!(request.unit_cost, Decimal::new(1250, 2));
    }

    #[test]
    fn test_add_request_comma_price_and_bad_price() {
        let request = AddRequest::from_payload(&json!({"itemId": "I1", "price": "4,50"})).unwrap();
        assert_eq!(request.unit_cost, Decimal::new(45, 1));

        let request = AddRequest::from_payload(&json!({"itemId": "I1", "price": "free"})).unwrap();
        assert_eq!(request.unit_cost, Decimal::ZERO);
        assert!(request.name.is_none());
    }

    #[test]
    fn test_add_request_missing_id() {
        let err = AddRequest::from_payload(&json!({"name": "Orphan", "price": 1})).unwrap_err();
        assert_eq!(err, ValidationError::MissingItemId);

        let err = AddRequest::from_payload(&json!({"item": {"Name": "Orphan"}})).unwrap_err();
        assert_eq!(err, ValidationError::MissingItemId);
    }

    #[test]
    fn test_normalize_checkout_line_strings() {
        let line =
            normalize_checkout_line(&json!({"itemId": "I2", "amount": "3", "unitCost": "4,50"}))
                .unwrap();
        assert_eq!(
            line,
            CheckoutLine {
                item_id: ItemId::new("I2"),
                amount: 3,
                unit_cost: Decimal::new(45, 1),
            }
        );
    }

    #[test]
    fn test_normalize_checkout_line_defaults() {
        let line = normalize_checkout_line(&json!({"item": {"Id": "I9"}, "amount": "lots"})).unwrap();
        assert_eq!(line.item_id.as_str(), "I9");
        assert_eq!(line.amount, 0);
        assert_eq!(line.unit_cost, Decimal::ZERO);
    }

    #[test]
    fn test_normalize_checkout_line_without_id() {
        assert!(normalize_checkout_line(&json!({"amount": 2, "unitCost": 3})).is_none());
        assert!(normalize_checkout_line(&json!("I1")).is_none());
    }
}
