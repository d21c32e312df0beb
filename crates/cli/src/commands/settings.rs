//! Settings file management.
//!
//! # Usage
//!
//! ```bash
//! pwa-cli settings show
//! pwa-cli settings --path /srv/pwa/settings.json set icon logo.png
//! pwa-cli settings unset consumer_secret
//! ```
//!
//! # Environment Variables
//!
//! - `PWACOMMERCE_SETTINGS_PATH` - Settings file used when `--path` is not given

use std::path::PathBuf;

use pwacommerce_api::config::DEFAULT_SETTINGS_PATH;
use pwacommerce_api::settings::{
    CONSUMER_KEY, CONSUMER_SECRET, ICON, JsonFileSettings, Settings, SettingsError, SettingsStore,
};
use serde_json::{Map, Value};
use tracing::{info, warn};

const KNOWN_KEYS: [&str; 3] = [CONSUMER_KEY, CONSUMER_SECRET, ICON];

/// The settings file to operate on.
///
/// An explicit path wins over `PWACOMMERCE_SETTINGS_PATH`.
#[must_use]
pub fn store(path: Option<PathBuf>) -> JsonFileSettings {
    let path = path
        .or_else(|| std::env::var_os("PWACOMMERCE_SETTINGS_PATH").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));
    JsonFileSettings::new(path)
}

/// Print all settings as JSON, secret redacted.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read.
#[allow(clippy::print_stdout)]
pub async fn show(store: &JsonFileSettings) -> Result<(), SettingsError> {
    let settings = store.load().await?;
    println!("{}", render(&settings));
    Ok(())
}

/// Set one setting and save the file.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read or written.
pub async fn set(store: &JsonFileSettings, key: &str, value: &str) -> Result<(), SettingsError> {
    if !KNOWN_KEYS.contains(&key) {
        warn!(key, "Unknown setting, storing it anyway");
    }

    let mut settings = store.load().await?;
    settings.set(key, value.trim());
    store.save(&settings).await?;

    info!(key, path = %store.path().display(), "Setting saved");
    Ok(())
}

/// Remove one setting and save the file.
///
/// # Errors
///
/// Returns an error if the settings file cannot be read or written.
pub async fn unset(store: &JsonFileSettings, key: &str) -> Result<(), SettingsError> {
    let mut settings = store.load().await?;
    if !settings.remove(key) {
        info!(key, "Setting was not set");
        return Ok(());
    }
    store.save(&settings).await?;

    info!(key, path = %store.path().display(), "Setting removed");
    Ok(())
}

fn render(settings: &Settings) -> String {
    let view: Map<String, Value> = settings
        .redacted()
        .map(|(key, value)| (key.to_string(), Value::from(value)))
        .collect();
    Value::Object(view).to_string()
}
