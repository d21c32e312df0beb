//! Shopper cart backed by the WooCommerce Store API.
//!
//! The Store API identifies a shopper's cart by the site's session cookies.
//! A session is opened by reading the cart once, which makes the store issue
//! the session cookies and a `Nonce` required by cart mutations. The cookies
//! are relayed to the shopper on the checkout redirect so the checkout page
//! sees the same cart.

use async_trait::async_trait;
use pwacommerce_core::CartLineItem;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use tracing::{debug, instrument};
use url::Url;

use super::{CartService, CartSession, CommerceError, USER_AGENT};
use crate::config::ApiConfig;

/// Store API root, relative to the site URL.
const STORE_API_ROOT: &str = "wp-json/wc/store/v1/";

/// Nonce response headers, current name first.
const NONCE_HEADERS: [&str; 2] = ["nonce", "x-wc-store-api-nonce"];

/// Cart service for the configured site.
#[derive(Clone)]
pub struct StoreApiCart {
    http: reqwest::Client,
    store_root: Url,
    checkout_url: String,
}

impl StoreApiCart {
    /// Create a cart service for the site in `config`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build or the Store API URL is invalid.
    pub fn new(config: &ApiConfig) -> Result<Self, CommerceError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Self::with_client(http, config)
    }

    /// Create a cart service sharing an existing HTTP client.
    ///
    /// # Errors
    ///
    /// Returns error if the Store API URL is invalid.
    pub fn with_client(http: reqwest::Client, config: &ApiConfig) -> Result<Self, CommerceError> {
        Ok(Self {
            http,
            store_root: config.site_endpoint(STORE_API_ROOT)?,
            checkout_url: config.checkout_url(),
        })
    }
}

#[async_trait]
impl CartService for StoreApiCart {
    #[instrument(skip(self, cookie_header), fields(has_cookies = cookie_header.is_some()))]
    async fn start_session(
        &self,
        cookie_header: Option<&str>,
    ) -> Result<Box<dyn CartSession>, CommerceError> {
        let mut session = StoreCartSession {
            http: self.http.clone(),
            store_root: self.store_root.clone(),
            jar: shopper_jar(cookie_header.unwrap_or_default(), &self.store_root),
            nonce: None,
            set_cookies: Vec::new(),
        };

        let url = self.store_root.join("cart")?;
        let request = session.with_session_headers(self.http.get(url.clone()), &url);
        let response = request.send().await?;
        session.absorb(response.headers());

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CommerceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(has_nonce = session.nonce.is_some(), "Cart session opened");
        Ok(Box::new(session))
    }

    fn checkout_url(&self) -> String {
        self.checkout_url.clone()
    }
}

/// An open Store API cart session.
pub struct StoreCartSession {
    http: reqwest::Client,
    store_root: Url,
    jar: Jar,
    nonce: Option<String>,
    set_cookies: Vec<String>,
}

impl StoreCartSession {
    fn with_session_headers(
        &self,
        request: reqwest::RequestBuilder,
        url: &Url,
    ) -> reqwest::RequestBuilder {
        let mut request = request.header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(cookie) = self.jar.cookies(url) {
            request = request.header(COOKIE, cookie);
        }
        if let Some(nonce) = &self.nonce {
            request = request.header("Nonce", nonce.as_str());
        }
        request
    }

    /// Pick up the session cookies and nonce from a response.
    fn absorb(&mut self, headers: &HeaderMap) {
        self.jar
            .set_cookies(&mut headers.get_all(SET_COOKIE).iter(), &self.store_root);
        self.set_cookies.extend(
            headers
                .get_all(SET_COOKIE)
                .iter()
                .filter_map(|value| value.to_str().ok())
                .map(String::from),
        );

        if let Some(nonce) = NONCE_HEADERS
            .iter()
            .find_map(|name| headers.get(*name).and_then(|v| v.to_str().ok()))
        {
            self.nonce = Some(nonce.to_string());
        }
    }
}

#[async_trait]
impl CartSession for StoreCartSession {
    #[instrument(skip(self))]
    async fn add_item(&mut self, item: &CartLineItem) -> Result<(), CommerceError> {
        // Variations are added by their own id.
        let id = item
            .variation_id
            .map_or_else(|| item.product_id.as_u64(), |v| v.as_u64());

        let url = self.store_root.join("cart/add-item")?;
        let body = serde_json::json!({ "id": id, "quantity": item.quantity });

        let request = self.with_session_headers(self.http.post(url.clone()).json(&body), &url);
        let response = request.send().await?;
        self.absorb(response.headers());

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CommerceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(id, quantity = item.quantity, "Added item to cart");
        Ok(())
    }

    fn set_cookies(&self) -> Vec<String> {
        self.set_cookies.clone()
    }
}

/// A cookie jar holding the shopper's cookies for the store.
///
/// Cookies from the `Cookie` request header carry no attributes, so they are
/// scoped to the whole site.
fn shopper_jar(cookie_header: &str, store_root: &Url) -> Jar {
    let jar = Jar::default();
    for pair in cookie_header.split(';').map(str::trim) {
        if pair.contains('=') && !pair.starts_with('=') {
            jar.add_cookie_str(&format!("{pair}; Path=/"), store_root);
        }
    }
    jar
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap as AxumHeaders, StatusCode},
        response::IntoResponse,
        routing::{get, post},
    };
    use serde_json::{Value, json};

    use super::*;

    type Calls = Arc<Mutex<Vec<Value>>>;

    /// Cookie pairs of a recorded `Cookie` header, sorted.
    fn cookie_names(header: &Value) -> Vec<String> {
        let mut pairs: Vec<String> = header
            .as_str()
            .unwrap_or_default()
            .split("; ")
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect();
        pairs.sort_unstable();
        pairs
    }

    async fn read_cart(headers: AxumHeaders) -> impl IntoResponse {
        let has_session = headers
            .get("cookie")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|c| c.contains("wp_woocommerce_session_abc"));

        let mut response = Json(json!({"items": []})).into_response();
        response
            .headers_mut()
            .insert("nonce", HeaderValue::from_static("nonce-1"));
        if !has_session {
            response.headers_mut().insert(
                "set-cookie",
                HeaderValue::from_static("wp_woocommerce_session_abc=sess-1; path=/; HttpOnly"),
            );
        }
        response
    }

    async fn add_item(
        State(calls): State<Calls>,
        headers: AxumHeaders,
        Json(body): Json<Value>,
    ) -> impl IntoResponse {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        calls.lock().unwrap().push(json!({
            "body": body,
            "cookie": header("cookie"),
            "nonce": header("nonce"),
        }));

        if body["id"] == 999 {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"code": "woocommerce_rest_product_invalid_id"})),
            )
                .into_response();
        }

        let mut response = (StatusCode::CREATED, Json(json!({"items_count": 1}))).into_response();
        response.headers_mut().insert(
            "set-cookie",
            HeaderValue::from_static("woocommerce_items_in_cart=1; path=/"),
        );
        response
    }

    async fn store(calls: Calls) -> StoreApiCart {
        let router = Router::new()
            .route("/wp-json/wc/store/v1/cart", get(read_cart))
            .route("/wp-json/wc/store/v1/cart/add-item", post(add_item))
            .with_state(calls);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let config = ApiConfig::from_lookup(|key| {
            (key == "PWACOMMERCE_SITE_URL").then(|| format!("http://{addr}"))
        })
        .unwrap();
        StoreApiCart::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_session_carries_cookies_and_nonce() {
        let calls = Calls::default();
        let cart = store(calls.clone()).await;

        let mut session = cart.start_session(Some("theme=dark")).await.unwrap();
        session.add_item(&CartLineItem::simple(12, 2)).await.unwrap();
        session
            .add_item(&CartLineItem::variation(30, 1, 31))
            .await
            .unwrap();

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0]["body"], json!({"id": 12, "quantity": 2}));
        assert_eq!(calls[1]["body"], json!({"id": 31, "quantity": 1}));
        assert_eq!(calls[0]["nonce"], "nonce-1");
        assert_eq!(
            cookie_names(&calls[0]["cookie"]),
            ["theme=dark", "wp_woocommerce_session_abc=sess-1"]
        );
        assert_eq!(
            cookie_names(&calls[1]["cookie"]),
            [
                "theme=dark",
                "woocommerce_items_in_cart=1",
                "wp_woocommerce_session_abc=sess-1"
            ]
        );

        let cookies = session.set_cookies();
        assert_eq!(cookies.len(), 3);
        assert!(cookies[0].starts_with("wp_woocommerce_session_abc=sess-1"));
    }

    #[tokio::test]
    async fn test_existing_session_is_reused() {
        let cart = store(Calls::default()).await;

        let session = cart
            .start_session(Some("wp_woocommerce_session_abc=existing"))
            .await
            .unwrap();
        assert!(session.set_cookies().is_empty());
    }

    #[tokio::test]
    async fn test_rejected_item_is_an_api_error() {
        let cart = store(Calls::default()).await;
        let mut session = cart.start_session(None).await.unwrap();

        let err = session
            .add_item(&CartLineItem::simple(999, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::Api { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_checkout_url_comes_from_config() {
        let cart = store(Calls::default()).await;
        assert!(cart.checkout_url().ends_with("/checkout/"));
    }

    fn store_root() -> Url {
        Url::parse("https://shop.example.com/wp-json/wc/store/v1/").unwrap()
    }

    fn jar_header(jar: &Jar) -> Option<String> {
        jar.cookies(&store_root().join("cart/add-item").unwrap())
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[test]
    fn test_shopper_cookies_seed_the_jar() {
        let jar = shopper_jar(" a=1; b = 2 ;junk; =x", &store_root());
        let header = jar_header(&jar).unwrap();

        let mut pairs: Vec<&str> = header.split("; ").collect();
        pairs.sort_unstable();
        assert_eq!(pairs, ["a=1", "b=2"]);

        assert!(jar_header(&shopper_jar("", &store_root())).is_none());
    }

    #[test]
    fn test_expired_set_cookie_removes_cookie() {
        let jar = shopper_jar("wp_woocommerce_session_abc=old", &store_root());
        let expired = HeaderValue::from_static(
            "wp_woocommerce_session_abc=deleted; expires=Thu, 01 Jan 1970 00:00:01 GMT; Max-Age=0; path=/",
        );
        jar.set_cookies(&mut std::iter::once(&expired), &store_root());

        assert!(jar_header(&jar).is_none());
    }

    #[test]
    fn test_set_cookie_replaces_value() {
        let jar = shopper_jar("wp_woocommerce_session_abc=old", &store_root());
        let fresh = HeaderValue::from_static("wp_woocommerce_session_abc=new; path=/; HttpOnly");
        jar.set_cookies(&mut std::iter::once(&fresh), &store_root());

        assert_eq!(
            jar_header(&jar).as_deref(),
            Some("wp_woocommerce_session_abc=new")
        );
    }
}
