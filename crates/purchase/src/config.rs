//! Item purchase configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ITEM_SERVICE_BASE_URL` - Base URL of the remote item service org
//! - `ITEM_SERVICE_ACCESS_TOKEN` - Bearer token for the item service
//!
//! ## Optional
//! - `ITEM_SERVICE_CACHE_TTL_SECS` - Filter/search cache TTL (default: 300)
//! - `ITEM_PURCHASE_RETAIN_CART` - Keep the cart when the account changes (default: false)
//! - `ITEM_PURCHASE_DEFAULT_ACCOUNT` - Account context used when none is routed

use std::time::Duration;

use item_purchase_core::AccountId;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// What happens to the cart when the account context changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CartRetention {
    /// Empty the cart so lines never leak across accounts.
    #[default]
    ClearOnContextChange,
    /// Keep the cart across account changes.
    Retain,
}

/// Item purchase application configuration.
#[derive(Debug, Clone, Default)]
pub struct PurchaseConfig {
    /// Cart behavior on account change
    pub cart_retention: CartRetention,
    /// Account context to assume until routing provides one
    pub default_account: Option<AccountId>,
}

/// Remote item service configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ItemServiceConfig {
    /// Base URL of the service (scheme and host, optional path prefix)
    pub base_url: Url,
    /// Bearer access token
    pub access_token: SecretString,
    /// TTL for cached filter options and search results
    pub cache_ttl: Duration,
}

impl std::fmt::Debug for ItemServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemServiceConfig")
            .field("base_url", &self.base_url.as_str())
            .field("access_token", &"[REDACTED]")
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl PurchaseConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let retain = parse_bool("ITEM_PURCHASE_RETAIN_CART", false)?;
        let cart_retention = if retain {
            CartRetention::Retain
        } else {
            CartRetention::ClearOnContextChange
        };
        let default_account = get_optional_env("ITEM_PURCHASE_DEFAULT_ACCOUNT")
            .filter(|v| !v.trim().is_empty())
            .map(AccountId::new);

        Ok(Self {
            cart_retention,
            default_account,
        })
    }
}

impl ItemServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, the base URL
    /// is not an http(s) URL, or the token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let base_url = parse_base_url(
            "ITEM_SERVICE_BASE_URL",
            &get_required_env("ITEM_SERVICE_BASE_URL")?,
        )?;
        let access_token = get_validated_secret("ITEM_SERVICE_ACCESS_TOKEN")?;
        let cache_ttl = get_env_or_default(
            "ITEM_SERVICE_CACHE_TTL_SECS",
            &DEFAULT_CACHE_TTL_SECS.to_string(),
        )
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| {
            ConfigError::InvalidEnvVar("ITEM_SERVICE_CACHE_TTL_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            base_url,
            access_token,
            cache_ttl,
        })
    }

    /// Build a configuration directly (tests, embedding).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the base URL is not an http(s) URL.
    pub fn new(base_url: &str, access_token: SecretString) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("base_url", base_url)?,
            access_token,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        })
    }

    /// Returns the access token for request signing.
    #[must_use]
    pub fn token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a boolean flag (`true/false`, `1/0`, `yes/no`).
fn parse_bool(key: &str, default: bool) -> Result<bool, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |raw| parse_bool_value(key, &raw))
}

fn parse_bool_value(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

/// Parse and normalize the service base URL so relative joins append to it.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be an http(s) URL, got '{raw}'"),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// Validate that a secret is not a placeholder.
fn validate_secret(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if lower.trim().is_empty() {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "must not be empty".to_string(),
        ));
    }

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_appends_slash() {
        let url = parse_base_url("K", "https://org.example.net/tenant").unwrap();
        assert_eq!(url.as_str(), "https://org.example.net/tenant/");

        let url = parse_base_url("K", "https://org.example.net").unwrap();
        assert_eq!(url.as_str(), "https://org.example.net/");
    }

    #[test]
    fn test_parse_base_url_rejects_non_http() {
        assert!(matches!(
            parse_base_url("K", "mailto:ops@org.net"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
        assert!(parse_base_url("K", "not a url").is_err());
    }

    #[test]
    fn test_parse_bool_value() {
        assert!(parse_bool_value("K", "TRUE").unwrap());
        assert!(parse_bool_value("K", "1").unwrap());
        assert!(!parse_bool_value("K", "no").unwrap());
        assert!(!parse_bool_value("K", "").unwrap());
        assert!(parse_bool_value("K", "maybe").is_err());
    }

    #[test]
    fn test_validate_secret_placeholder() {
        let err = validate_secret("your-token-here", "TEST_VAR").unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
        assert!(validate_secret("   ", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_valid() {
        assert!(validate_secret("00Dxx0000001gPL!AQ4AQFpTq3", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_service_config_debug_redacts_token() {
        let config = ItemServiceConfig::new(
            "https://org.example.net",
            SecretString::from("super_secret_token_value"),
        )
        .unwrap();

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("org.example.net"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token_value"));
        assert_eq!(config.token(), "super_secret_token_value");
    }

    #[test]
    fn test_default_cart_retention_clears() {
        assert_eq!(
            PurchaseConfig::default().cart_retention,
            CartRetention::ClearOnContextChange
        );
    }
}
