//! Remote record shapes exchanged with the item service.
//!
//! Field names follow the remote record API (`Id`, `Name`, `Price__c`, ...),
//! so these types serialize exactly as the service expects.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{AccountId, ItemId};

/// Filter field holding item families.
pub const FAMILY_FIELD: &str = "Family__c";
/// Filter field holding item types.
pub const TYPE_FIELD: &str = "Type__c";

/// A catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "Id")]
    pub id: ItemId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Description__c", default)]
    pub description: Option<String>,
    #[serde(rename = "Type__c", default)]
    pub item_type: Option<String>,
    #[serde(rename = "Family__c", default)]
    pub family: Option<String>,
    #[serde(
        rename = "Price__c",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(rename = "Image__c", default)]
    pub image: Option<String>,
}

/// The account a purchase is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "Id")]
    pub id: AccountId,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "AccountNumber", default)]
    pub account_number: Option<String>,
    #[serde(rename = "Industry", default)]
    pub industry: Option<String>,
}

/// Allowed values per filter field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterOptions(BTreeMap<String, Vec<String>>);

impl FilterOptions {
    #[must_use]
    pub const fn new(fields: BTreeMap<String, Vec<String>>) -> Self {
        Self(fields)
    }

    /// Allowed values of a filter field, empty when the field is unknown.
    #[must_use]
    pub fn values(&self, field: &str) -> &[String] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn families(&self) -> &[String] {
        self.values(FAMILY_FIELD)
    }

    #[must_use]
    pub fn types(&self) -> &[String] {
        self.values(TYPE_FIELD)
    }
}

/// Catalog search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub search_text: String,
    pub families: Vec<String>,
    pub types: Vec<String>,
}

/// Record fields for a new catalog item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(
        rename = "Price__c",
        default,
        with = "rust_decimal::serde::float_option"
    )]
    pub price: Option<Decimal>,
    #[serde(rename = "Type__c", default)]
    pub item_type: Option<String>,
    #[serde(rename = "Family__c", default)]
    pub family: Option<String>,
    #[serde(rename = "Description__c", default)]
    pub description: Option<String>,
    #[serde(rename = "Image__c", default)]
    pub image: Option<String>,
}
