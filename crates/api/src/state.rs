//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ApiConfig;
use crate::error::AppError;
use crate::settings::{Credentials, JsonFileSettings, Settings, SettingsStore};
use crate::uploads::{LocalUploads, UploadResolver};
use crate::woocommerce::{
    CartService, CommerceApi, CommerceConnector, CommerceError, StoreApiCart, USER_AGENT,
    WooConnector,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The store-facing collaborators
/// are held as trait objects so tests can swap in in-memory versions.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    settings: Arc<dyn SettingsStore>,
    uploads: Arc<dyn UploadResolver>,
    connector: Arc<dyn CommerceConnector>,
    cart: Arc<dyn CartService>,
}

impl AppState {
    /// Create the production state: JSON settings file, local uploads and
    /// the HTTP-backed store clients (sharing one connection pool).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built or the site URL
    /// cannot be turned into API endpoints.
    pub fn new(config: ApiConfig) -> Result<Self, CommerceError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;

        let settings = Arc::new(JsonFileSettings::new(config.settings_path.clone()));
        let uploads = Arc::new(LocalUploads::new(&config.uploads));
        let connector = Arc::new(WooConnector::with_client(http.clone(), &config)?);
        let cart = Arc::new(StoreApiCart::with_client(http, &config)?);

        Ok(Self::from_parts(config, settings, uploads, connector, cart))
    }

    /// Assemble state from explicit collaborators.
    #[must_use]
    pub fn from_parts(
        config: ApiConfig,
        settings: Arc<dyn SettingsStore>,
        uploads: Arc<dyn UploadResolver>,
        connector: Arc<dyn CommerceConnector>,
        cart: Arc<dyn CartService>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                settings,
                uploads,
                connector,
                cart,
            }),
        }
    }

    /// Get a reference to the service configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the settings store.
    #[must_use]
    pub fn settings(&self) -> &dyn SettingsStore {
        self.inner.settings.as_ref()
    }

    /// Get a reference to the upload resolver.
    #[must_use]
    pub fn uploads(&self) -> &dyn UploadResolver {
        self.inner.uploads.as_ref()
    }

    /// Get a reference to the shopper cart service.
    #[must_use]
    pub fn cart(&self) -> &dyn CartService {
        self.inner.cart.as_ref()
    }

    /// The current settings and the store API credentials they hold.
    ///
    /// Every store endpoint goes through this check.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the credentials have been removed
    /// since start-up, matching what a fresh start would expose.
    pub async fn enabled_settings(&self) -> Result<(Settings, Credentials), AppError> {
        let settings = self.settings().load().await?;
        let credentials = settings.credentials().ok_or_else(|| {
            tracing::warn!("Store API credentials missing, endpoint disabled");
            AppError::NotFound("endpoint disabled".to_string())
        })?;
        Ok((settings, credentials))
    }

    /// A store API client for the credentials currently in the settings.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` when the credentials have been removed.
    pub async fn commerce(&self) -> Result<Box<dyn CommerceApi>, AppError> {
        let (_, credentials) = self.enabled_settings().await?;
        Ok(self.inner.connector.connect(&credentials)?)
    }
}
