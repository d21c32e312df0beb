//! Store connectivity check.
//!
//! Reads one product category with the stored credentials, which exercises
//! the site URL, the API version and the key pair in a single call.

use pwacommerce_api::config::{ApiConfig, ConfigError};
use pwacommerce_api::settings::{JsonFileSettings, SettingsError, SettingsStore};
use pwacommerce_api::woocommerce::{CommerceApi, CommerceError, WooConnector};
use pwacommerce_core::ListQuery;
use thiserror::Error;
use tracing::info;

/// Errors reported by the connectivity check.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Key or secret is empty.
    #[error("consumer_key and consumer_secret must both be set (pwa-cli settings set ...)")]
    MissingCredentials,

    #[error("Store request failed: {0}")]
    Commerce(#[from] CommerceError),
}

/// Run the check.
///
/// # Errors
///
/// Returns an error if the credentials are missing or the store rejects the call.
pub async fn run() -> Result<(), CheckError> {
    let config = ApiConfig::from_env()?;
    let settings = JsonFileSettings::new(config.settings_path.clone())
        .load()
        .await?;
    let credentials = settings
        .credentials()
        .ok_or(CheckError::MissingCredentials)?;

    info!(site = %config.site_url, version = %config.woocommerce.api_version, "Checking store API");

    let api = WooConnector::new(&config)?.client(&credentials);
    let query = ListQuery {
        per_page: Some(1),
        ..ListQuery::none()
    };
    let categories = api.get("products/categories", &query).await?;

    info!(
        returned = categories.as_array().map_or(0, Vec::len),
        "Store API reachable"
    );
    Ok(())
}
