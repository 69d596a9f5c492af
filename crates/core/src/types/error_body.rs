//! Structured error bodies returned by the remote item service.
//!
//! A failed call reports errors at three levels: per-field errors, page-level
//! errors, and a generic message. [`ErrorBody::user_message`] picks the most
//! specific non-empty one.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Message used when no error detail carries any text.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// A single error entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

/// Error payload of a failed remote call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub page_errors: Vec<ErrorDetail>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field_errors: BTreeMap<String, Vec<ErrorDetail>>,
}

/// Services send `null` for an empty error list.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ErrorBody {
    /// Build a body carrying only a generic message.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Parse a raw response body.
    ///
    /// Accepts the structured object shape, a bare array of error entries
    /// (treated as page-level errors), or plain text (treated as the generic
    /// message).
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if let Ok(body) = serde_json::from_str::<Self>(raw) {
            return body;
        }
        if let Ok(page_errors) = serde_json::from_str::<Vec<ErrorDetail>>(raw) {
            return Self {
                page_errors,
                ..Self::default()
            };
        }
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::default()
        } else {
            Self::from_message(trimmed)
        }
    }

    /// First non-empty field-level message, in field-name order.
    #[must_use]
    pub fn field_message(&self) -> Option<&str> {
        self.field_errors
            .values()
            .flatten()
            .map(|d| d.message.trim())
            .find(|m| !m.is_empty())
    }

    /// First non-empty page-level message.
    #[must_use]
    pub fn page_message(&self) -> Option<&str> {
        self.page_errors
            .iter()
            .map(|d| d.message.trim())
            .find(|m| !m.is_empty())
    }

    /// Generic message, when non-empty.
    #[must_use]
    pub fn generic_message(&self) -> Option<&str> {
        self.message.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }

    /// The message to show a user.
    ///
    /// Precedence: field-level detail, page-level detail, generic message,
    /// then [`UNKNOWN_ERROR`].
    #[must_use]
    pub fn user_message(&self) -> &str {
        self.field_message()
            .or_else(|| self.page_message())
            .or_else(|| self.generic_message())
            .unwrap_or(UNKNOWN_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_win() {
        let body = ErrorBody::parse(
            r#"{
                "message": "Insert failed",
                "pageErrors": [{"message": "Page problem"}],
                "fieldErrors": {"Price__c": [{"message": "Price must be positive"}]}
            }"#,
        );
        assert_eq!(body.user_message(), "Price must be positive");
    }

    #[test]
    fn test_page_errors_before_generic() {
        let body = ErrorBody::parse(
            r#"{"message": "Insert failed", "pageErrors": [{"message": ""}, {"message": "Locked"}]}"#,
        );
        assert_eq!(body.user_message(), "Locked");
    }

    #[test]
    fn test_generic_message() {
        let body = ErrorBody::parse(r#"{"message": "Insert failed", "fieldErrors": {"Name": []}}"#);
        assert_eq!(body.user_message(), "Insert failed");
    }

    #[test]
    fn test_bare_error_array() {
        let body = ErrorBody::parse(
            r#"[{"message": "Session expired", "errorCode": "INVALID_SESSION_ID"}]"#,
        );
        assert_eq!(body.user_message(), "Session expired");
        assert_eq!(
            body.page_errors.first().and_then(|d| d.error_code.as_deref()),
            Some("INVALID_SESSION_ID")
        );
    }

    #[test]
    fn test_null_error_lists() {
        let body = ErrorBody::parse(r#"{"message":"Boom","pageErrors":null,"fieldErrors":null}"#);
        assert_eq!(body.user_message(), "Boom");
        assert!(body.page_errors.is_empty());

        let body = ErrorBody::parse(
            r#"{"message":null,"pageErrors":[{"message":"Locked"}],"fieldErrors":null}"#,
        );
        assert_eq!(body.user_message(), "Locked");
    }

    #[test]
    fn test_plain_text_and_empty() {
        assert_eq!(ErrorBody::parse("Bad gateway").user_message(), "Bad gateway");
        assert_eq!(ErrorBody::parse("   ").user_message(), UNKNOWN_ERROR);
        assert_eq!(ErrorBody::parse("{}").user_message(), UNKNOWN_ERROR);
    }
}
