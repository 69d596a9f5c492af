//! CLI command implementations.
//!
//! # Environment Variables
//!
//! - `ITEM_SERVICE_BASE_URL` - Base URL of the item service
//! - `ITEM_SERVICE_ACCESS_TOKEN` - Bearer token for the item service
//! - `ITEM_PURCHASE_DEFAULT_ACCOUNT` - Account used when `--account` is absent

pub mod catalog;
pub mod purchase;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use item_purchase::PurchaseApp;
use item_purchase::config::{ConfigError, ItemServiceConfig, PurchaseConfig};
use item_purchase::navigation::LinkNavigator;
use item_purchase::notify::NoticeBuffer;
use item_purchase::remote::{RemoteError, RestItemService};
use item_purchase::AppError;
use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is missing or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The item service failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// An app operation failed (already reported as a notice).
    #[error(transparent)]
    App(#[from] AppError),

    /// An input file could not be read.
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An input file is not the expected JSON.
    #[error("Invalid JSON in {path}: {source}")]
    InvalidFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Output could not be serialized.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),

    /// A `--item` argument is malformed.
    #[error("Invalid item '{0}', expected ITEM_ID[:AMOUNT[:UNIT_COST]]")]
    InvalidItem(String),
}

/// Everything a command needs to talk to the item service.
pub struct Context {
    pub app: PurchaseApp,
    pub service: Arc<RestItemService>,
    pub notices: Arc<NoticeBuffer>,
}

/// Build the app from environment configuration.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the HTTP client cannot be
/// built.
pub fn context() -> Result<Context, CliError> {
    let service_config = ItemServiceConfig::from_env()?;
    let config = PurchaseConfig::from_env()?;

    let service = Arc::new(RestItemService::new(&service_config)?);
    let navigator = Arc::new(LinkNavigator::new(
        service_config.base_url.clone(),
        open_record as fn(&Url),
    ));
    let notices = Arc::new(NoticeBuffer::new());

    let app = PurchaseApp::new(config, service.clone(), navigator, notices.clone());

    Ok(Context {
        app,
        service,
        notices,
    })
}

#[allow(clippy::print_stdout)]
fn open_record(url: &Url) {
    println!("Open: {url}");
}

/// Print every collected notice.
#[allow(clippy::print_stdout)]
pub fn print_notices(notices: &NoticeBuffer) {
    for notice in notices.drain() {
        println!("{notice}");
    }
}

/// Print a value as pretty JSON.
///
/// # Errors
///
/// Returns an error if the value cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Read and parse a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&content).map_err(|source| CliError::InvalidFile {
        path: path.to_path_buf(),
        source,
    })
}
