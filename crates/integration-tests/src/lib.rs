//! Integration tests for PWAcommerce.
//!
//! The full router is driven in-process with `tower::ServiceExt::oneshot`.
//! The store is replaced by in-memory collaborators that record every call,
//! so no WooCommerce site is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pwacommerce-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use http_body_util::BodyExt;
use pwacommerce_api::config::ApiConfig;
use pwacommerce_api::routes::register_routes;
use pwacommerce_api::settings::{
    CONSUMER_KEY, CONSUMER_SECRET, Credentials, Settings, SettingsError, SettingsStore,
};
use pwacommerce_api::state::AppState;
use pwacommerce_api::uploads::UploadResolver;
use pwacommerce_api::woocommerce::{
    CartService, CartSession, CommerceApi, CommerceConnector, CommerceError,
};
use pwacommerce_core::{CartLineItem, ListQuery};
use serde_json::Value;
use tower::ServiceExt;

/// Site every test app points at.
pub const SITE_URL: &str = "https://shop.example.com";

/// Session cookie handed out by [`RecordingCart`].
pub const CART_COOKIE: &str = "woocommerce_items_in_cart=1; path=/";

/// Configuration for a test app, with extra variables on top of the site URL.
pub fn config(extra: &[(&str, &str)]) -> ApiConfig {
    let extra: Vec<(String, String)> = extra
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    ApiConfig::from_lookup(move |key| {
        if key == "PWACOMMERCE_SITE_URL" {
            return Some(SITE_URL.to_string());
        }
        extra
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .unwrap()
}

/// Settings holding a valid key pair.
pub fn with_credentials() -> Settings {
    [(CONSUMER_KEY, "ck_test"), (CONSUMER_SECRET, "cs_test")]
        .into_iter()
        .collect()
}

// =============================================================================
// Settings
// =============================================================================

/// Settings that tests can change while the app is running.
#[derive(Clone, Default)]
pub struct SharedSettings(Arc<Mutex<Settings>>);

impl SharedSettings {
    pub fn new(settings: Settings) -> Self {
        Self(Arc::new(Mutex::new(settings)))
    }

    pub fn replace(&self, settings: Settings) {
        *self.0.lock().unwrap() = settings;
    }
}

#[async_trait]
impl SettingsStore for SharedSettings {
    async fn load(&self) -> Result<Settings, SettingsError> {
        Ok(self.0.lock().unwrap().clone())
    }
}

// =============================================================================
// Store REST API
// =============================================================================

type Responder = dyn Fn(&str, &ListQuery) -> Result<Value, CommerceError> + Send + Sync;

/// A store whose answers are scripted per test. Every call is recorded.
#[derive(Clone)]
pub struct ScriptedStore {
    calls: Arc<Mutex<Vec<(String, ListQuery)>>>,
    keys: Arc<Mutex<Vec<String>>>,
    respond: Arc<Responder>,
}

impl ScriptedStore {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&str, &ListQuery) -> Result<Value, CommerceError> + Send + Sync + 'static,
    {
        Self {
            calls: Arc::default(),
            keys: Arc::default(),
            respond: Arc::new(respond),
        }
    }

    /// A store that answers every call with `value`.
    pub fn always(value: Value) -> Self {
        Self::new(move |_, _| Ok(value.clone()))
    }

    /// Endpoint and query of every call so far.
    pub fn calls(&self) -> Vec<(String, ListQuery)> {
        self.calls.lock().unwrap().clone()
    }

    /// Consumer keys the store was connected with.
    pub fn connected_keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommerceApi for ScriptedStore {
    async fn get(&self, endpoint: &str, query: &ListQuery) -> Result<Value, CommerceError> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint.to_string(), query.clone()));
        (self.respond)(endpoint, query)
    }
}

impl CommerceConnector for ScriptedStore {
    fn connect(&self, credentials: &Credentials) -> Result<Box<dyn CommerceApi>, CommerceError> {
        self.keys
            .lock()
            .unwrap()
            .push(credentials.consumer_key.clone());
        Ok(Box::new(self.clone()))
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A cart that records added lines.
#[derive(Clone, Default)]
pub struct RecordingCart {
    added: Arc<Mutex<Vec<CartLineItem>>>,
    cookies: Arc<Mutex<Vec<Option<String>>>>,
    refused_products: HashSet<u64>,
    unavailable: bool,
}

impl RecordingCart {
    /// A cart that refuses lines for the given products.
    pub fn refusing(products: &[u64]) -> Self {
        Self {
            refused_products: products.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// A cart whose sessions can never be opened.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Lines added so far, in order.
    pub fn added(&self) -> Vec<CartLineItem> {
        self.added.lock().unwrap().clone()
    }

    /// `Cookie` headers sessions were opened with.
    pub fn session_cookies(&self) -> Vec<Option<String>> {
        self.cookies.lock().unwrap().clone()
    }
}

#[async_trait]
impl CartService for RecordingCart {
    async fn start_session(
        &self,
        cookie_header: Option<&str>,
    ) -> Result<Box<dyn CartSession>, CommerceError> {
        self.cookies
            .lock()
            .unwrap()
            .push(cookie_header.map(String::from));
        if self.unavailable {
            return Err(CommerceError::Api {
                status: 503,
                body: String::new(),
            });
        }
        Ok(Box::new(self.clone()))
    }

    fn checkout_url(&self) -> String {
        format!("{SITE_URL}/checkout/")
    }
}

#[async_trait]
impl CartSession for RecordingCart {
    async fn add_item(&mut self, item: &CartLineItem) -> Result<(), CommerceError> {
        if self.refused_products.contains(&item.product_id.as_u64()) {
            return Err(CommerceError::Api {
                status: 400,
                body: r#"{"code":"woocommerce_rest_product_invalid_id"}"#.to_string(),
            });
        }
        self.added.lock().unwrap().push(*item);
        Ok(())
    }

    fn set_cookies(&self) -> Vec<String> {
        vec![CART_COOKIE.to_string()]
    }
}

// =============================================================================
// Uploads
// =============================================================================

/// Uploads that exist only for the listed file names.
#[derive(Clone, Default)]
pub struct KnownUploads(HashSet<String>);

impl KnownUploads {
    pub fn new(files: &[&str]) -> Self {
        Self(files.iter().map(|f| (*f).to_string()).collect())
    }
}

#[async_trait]
impl UploadResolver for KnownUploads {
    async fn file_url(&self, file_name: &str) -> Option<String> {
        self.0
            .contains(file_name)
            .then(|| format!("{SITE_URL}/wp-content/uploads/pwacommerce/{file_name}"))
    }
}

// =============================================================================
// App
// =============================================================================

/// Builder for an in-process app.
pub struct TestApp {
    pub config: ApiConfig,
    pub settings: SharedSettings,
    pub store: ScriptedStore,
    pub cart: RecordingCart,
    pub uploads: KnownUploads,
}

impl TestApp {
    pub fn new(settings: Settings) -> Self {
        Self {
            config: config(&[]),
            settings: SharedSettings::new(settings),
            store: ScriptedStore::always(Value::Array(Vec::new())),
            cart: RecordingCart::default(),
            uploads: KnownUploads::default(),
        }
    }

    #[must_use]
    pub fn store(mut self, store: ScriptedStore) -> Self {
        self.store = store;
        self
    }

    #[must_use]
    pub fn cart(mut self, cart: RecordingCart) -> Self {
        self.cart = cart;
        self
    }

    #[must_use]
    pub fn uploads(mut self, uploads: KnownUploads) -> Self {
        self.uploads = uploads;
        self
    }

    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Register the routes as the server does at start-up.
    pub async fn router(&self) -> Router {
        let state = AppState::from_parts(
            self.config.clone(),
            Arc::new(self.settings.clone()),
            Arc::new(self.uploads.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.cart.clone()),
        );
        register_routes(state).await.unwrap()
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Send a `GET` request.
pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    router.clone().oneshot(request).await.unwrap()
}

/// Send a `POST` request with a content type and body.
pub async fn post(router: &Router, uri: &str, content_type: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body.to_string()))
        .unwrap();
    router.clone().oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as text.
pub async fn text_body(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Assert a status and return the response for further checks.
pub fn expect_status(response: Response<Body>, status: StatusCode) -> Response<Body> {
    assert_eq!(response.status(), status, "unexpected status");
    response
}
