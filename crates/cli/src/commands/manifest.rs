//! Print the web app manifest the API would currently serve.

use pwacommerce_api::config::{ApiConfig, ConfigError};
use pwacommerce_api::services::manifest::build_manifest;
use pwacommerce_api::settings::{JsonFileSettings, SettingsError, SettingsStore};
use pwacommerce_api::uploads::LocalUploads;
use thiserror::Error;

/// Errors that can occur while building the manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("Could not serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Build the manifest from the environment and settings and print it.
///
/// # Errors
///
/// Returns an error if the configuration is incomplete or the settings
/// cannot be read.
#[allow(clippy::print_stdout)]
pub async fn print() -> Result<(), ManifestError> {
    let config = ApiConfig::from_env()?;
    let settings = JsonFileSettings::new(config.settings_path.clone())
        .load()
        .await?;
    let uploads = LocalUploads::new(&config.uploads);

    let manifest = build_manifest(&config, &settings, &uploads).await;
    println!("{}", serde_json::to_string_pretty(&manifest)?);
    Ok(())
}
