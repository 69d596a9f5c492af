//! Unified error handling.
//!
//! Every layer has its own error enum; `AppError` aggregates them for the
//! app's operations. Operations that report to the user emit a notice
//! before returning the error, so callers only need the error to decide
//! what happens next.

use item_purchase_core::ValidationError;
use thiserror::Error;

use crate::checkout::CheckoutError;
use crate::remote::RemoteError;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input was rejected before any remote call.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The item service failed.
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Checkout did not produce a purchase.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),
}

impl AppError {
    /// The message shown to the user for this error.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(e) => e.to_string(),
            Self::Remote(e) | Self::Checkout(CheckoutError::Remote(e)) => e.user_message(),
            Self::Checkout(CheckoutError::NoAccountContext) => {
                ValidationError::NoAccountContext.to_string()
            }
            Self::Checkout(CheckoutError::EmptyCart) => ValidationError::EmptyCart.to_string(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
