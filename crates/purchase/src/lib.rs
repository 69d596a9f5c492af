//! Item Purchase library.
//!
//! Owns the cart and checkout flow of the item purchase tool: catalog
//! search state, cart accumulation, checkout submission, and navigation to
//! the created purchase record. Rendering lives elsewhere; this crate exposes
//! state and consumes UI-boundary events.
//!
//! # Components
//!
//! - [`cart`] - Cart store and the display-row aggregator
//! - [`payload`] - Id/name/price resolution from loosely-shaped payloads
//! - [`checkout`] - Validation and single submission of a purchase
//! - [`navigation`] - Tiered navigation to the created purchase
//! - [`session`] - Account context tracking and reinitialization
//! - [`catalog`] - Search text, filters, and results
//! - [`create_item`] - New catalog item form
//! - [`remote`] - Remote item service seam and its HTTP client
//! - [`app`] - The owned application state receiving [`events::UiEvent`]s

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod create_item;
pub mod error;
pub mod events;
pub mod navigation;
pub mod notify;
pub mod payload;
pub mod remote;
pub mod session;
pub mod view;

pub use app::PurchaseApp;
pub use error::{AppError, Result};
