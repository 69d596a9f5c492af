//! Item Purchase Core - Shared types library.
//!
//! This crate provides common types used across all Item Purchase components:
//! - `item-purchase` - Cart and checkout orchestration library
//! - `cli` - Command-line front end over the remote item service
//!
//! # Architecture
//!
//! The core crate contains only types and pure parsing helpers - no I/O, no
//! HTTP clients, no async. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, cart/checkout lines, lenient price parsing,
//!   catalog records, notices, and remote error bodies

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
