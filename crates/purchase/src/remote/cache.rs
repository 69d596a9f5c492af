//! Cache types for item service responses.

use item_purchase_core::{FilterOptions, Item, SearchRequest};

/// Cache key for filter options and search results.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    FilterOptions,
    Search(SearchRequest),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    FilterOptions(FilterOptions),
    Items(Vec<Item>),
}
