//! Core types for Item Purchase.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod error_body;
pub mod id;
pub mod line;
pub mod notice;
pub mod price;
pub mod record;
pub mod validation;

pub use error_body::{ErrorBody, ErrorDetail, UNKNOWN_ERROR};
pub use id::*;
pub use line::{CartLine, CheckoutLine, DisplayRow};
pub use notice::{Notice, Severity};
pub use price::{parse_price, parse_price_input, parse_price_str, parse_quantity};
pub use record::{
    Account, FAMILY_FIELD, FilterOptions, Item, NewItem, SearchRequest, TYPE_FIELD,
};
pub use validation::ValidationError;
