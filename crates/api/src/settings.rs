//! Stored plugin settings: API keys and the uploaded app icon.
//!
//! Settings are kept apart from the environment configuration because they are
//! edited while the service runs (via `pwa-cli settings`). They are loaded
//! fresh on every request and never cached.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// WooCommerce REST API consumer key.
pub const CONSUMER_KEY: &str = "consumer_key";
/// WooCommerce REST API consumer secret.
pub const CONSUMER_SECRET: &str = "consumer_secret";
/// File name of the uploaded app icon.
pub const ICON: &str = "icon";

const REDACTED: &str = "[REDACTED]";

/// Errors reading or writing the settings store.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Settings I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Settings file {path} is not a JSON object of strings: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A snapshot of the stored settings.
///
/// Unknown keys are preserved so that saving never drops data written by a
/// newer version.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(BTreeMap<String, String>);

impl Settings {
    /// Get a setting, or `""` if it has never been set.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map_or("", String::as_str)
    }

    /// Set a setting.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Remove a setting, returning whether it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key).is_some()
    }

    /// The API credentials, if both the key and the secret are non-empty.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        let key = self.get(CONSUMER_KEY);
        let secret = self.get(CONSUMER_SECRET);
        if key.is_empty() || secret.is_empty() {
            return None;
        }
        Some(Credentials::new(key, secret))
    }

    /// The uploaded icon's file name, if one was uploaded.
    #[must_use]
    pub fn icon(&self) -> Option<&str> {
        Some(self.get(ICON)).filter(|icon| !icon.is_empty())
    }

    /// Iterate over settings with the consumer secret redacted.
    pub fn redacted(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| {
            let value = if key == CONSUMER_SECRET && !value.is_empty() {
                REDACTED
            } else {
                value.as_str()
            };
            (key.as_str(), value)
        })
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.redacted()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Settings {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// WooCommerce REST API key pair.
///
/// Implements `Debug` manually to redact the secret.
#[derive(Clone)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(consumer_key: &str, consumer_secret: &str) -> Self {
        Self {
            consumer_key: consumer_key.to_string(),
            consumer_secret: SecretString::from(consumer_secret),
        }
    }

    /// The consumer secret in plain text, for signing requests.
    #[must_use]
    pub fn secret(&self) -> &str {
        self.consumer_secret.expose_secret()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &REDACTED)
            .finish()
    }
}

/// Source of the current settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Read the current settings.
    async fn load(&self) -> Result<Settings, SettingsError>;
}

/// Settings persisted as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSettings {
    path: PathBuf,
}

impl JsonFileSettings {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the settings, replacing the file atomically.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Io` if the file cannot be written.
    pub async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let body = serde_json::to_vec_pretty(settings).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, body)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        tracing::debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> SettingsError {
        SettingsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettings {
    async fn load(&self) -> Result<Settings, SettingsError> {
        let body = match tokio::fs::read(&self.path).await {
            Ok(body) => body,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No settings file, using empty settings");
                return Ok(Settings::default());
            }
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_slice(&body).map_err(|source| SettingsError::Parse {
            path: self.path.clone(),
            source,
        })
    }
}
