//! WooCommerce REST API client and Store API cart.
//!
//! # Architecture
//!
//! - The store is the source of truth - NO local sync, no caching
//! - Every call is a single blocking-in-sequence request; no retries
//! - Handlers depend on the [`CommerceApi`] and [`CartService`] traits so the
//!   HTTP-backed implementations can be swapped for in-memory ones in tests
//!
//! # APIs
//!
//! ## REST API (`/wp-json/{version}/`)
//! - Products, categories, reviews, variations
//! - Authenticated with a consumer key/secret pair from the settings store
//!
//! ## Store API (`/wp-json/wc/store/v1/`)
//! - The shopper's cart, keyed by the site's session cookies
//!
//! # Example
//!
//! ```rust,ignore
//! use pwacommerce_api::woocommerce::{CommerceConnector, WooConnector};
//! use pwacommerce_core::ListQuery;
//!
//! let connector = WooConnector::new(&config)?;
//! let api = connector.connect(&credentials)?;
//!
//! let categories = api.get("products/categories", &ListQuery::categories()).await?;
//! ```

mod cart;
mod client;

pub use cart::{StoreApiCart, StoreCartSession};
pub use client::{WooClient, WooConnector};
pub(crate) use client::USER_AGENT;

use async_trait::async_trait;
use pwacommerce_core::{CartLineItem, ListQuery};
use serde_json::Value;
use thiserror::Error;

use crate::settings::Credentials;

/// Errors that can occur when talking to the store.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed before a response was received.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    /// The store answered with something that is not JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Read access to the store's REST API.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// `GET` an endpoint relative to the API root and return the JSON body as-is.
    async fn get(&self, endpoint: &str, query: &ListQuery) -> Result<Value, CommerceError>;
}

/// Builds API clients bound to a set of credentials.
pub trait CommerceConnector: Send + Sync {
    /// Create a client authenticated with `credentials`.
    ///
    /// # Errors
    ///
    /// Returns `CommerceError` if the client cannot be configured.
    fn connect(&self, credentials: &Credentials) -> Result<Box<dyn CommerceApi>, CommerceError>;
}

/// The shopper's cart on the store.
#[async_trait]
pub trait CartService: Send + Sync {
    /// Attach to the shopper's cart session, creating one if needed.
    ///
    /// `cookie_header` is the shopper's `Cookie` request header, if any.
    async fn start_session(
        &self,
        cookie_header: Option<&str>,
    ) -> Result<Box<dyn CartSession>, CommerceError>;

    /// Where to send the shopper to pay.
    fn checkout_url(&self) -> String;
}

/// An open cart session.
#[async_trait]
pub trait CartSession: Send {
    /// Add a line to the cart.
    async fn add_item(&mut self, item: &CartLineItem) -> Result<(), CommerceError>;

    /// `Set-Cookie` values the shopper needs to keep this session.
    fn set_cookies(&self) -> Vec<String>;
}
