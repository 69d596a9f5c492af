//! Local validation failures.
//!
//! These are resolved before any remote call is attempted.

/// Errors detected locally, without touching the network.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// An add-to-cart payload carried no resolvable item id.
    #[error("The position has no itemId.")]
    MissingItemId,
    /// Checkout was requested without an account context.
    #[error("Open the tool from an Account.")]
    NoAccountContext,
    /// Checkout was requested with no submittable lines.
    #[error("Please choose some items.")]
    EmptyCart,
    /// A new item was submitted without a name.
    #[error("Item name is required.")]
    MissingName,
    /// A hand-entered price is not a number.
    #[error("Enter a number, e.g. 123.45 (got '{0}')")]
    InvalidPrice(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        assert_eq!(
            ValidationError::NoAccountContext.to_string(),
            "Open the tool from an Account."
        );
        assert_eq!(
            ValidationError::InvalidPrice("abc".to_string()).to_string(),
            "Enter a number, e.g. 123.45 (got 'abc')"
        );
    }
}
