//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                               - Liveness check
//! GET  /health/ready                         - Readiness check (credentials present)
//!
//! # Store endpoints (under the namespace, default /pwacommerce)
//! GET  {ns}/export-manifest                  - Web app manifest
//! GET  {ns}/categories                       - Product categories
//! GET  {ns}/products?categId=N               - Category, featured or latest products
//! GET  {ns}/product/{id}                     - Single product
//! GET  {ns}/reviews/{id}                     - Newest reviews of a product
//! GET  {ns}/product-variations/{id}          - Variations of a product
//! POST {ns}/proceed-checkout                 - Fill the cart and redirect to checkout
//! ```
//!
//! The store endpoints are only registered when the settings hold both API
//! credentials at start-up.

pub mod catalog;
pub mod checkout;
pub mod extract;
pub mod health;
pub mod manifest;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Method, Request, header},
    middleware::from_fn,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::request_id_middleware;
use crate::settings::SettingsError;
use crate::state::AppState;

/// Create the store endpoints router.
pub fn commerce_routes() -> Router<AppState> {
    Router::new()
        .route("/export-manifest", get(manifest::export_manifest))
        .route("/categories", get(catalog::view_categories))
        .route("/products", get(catalog::view_products))
        .route("/product/{id}", get(catalog::view_product))
        .route("/reviews/{id}", get(catalog::view_reviews))
        .route(
            "/product-variations/{id}",
            get(catalog::view_product_variations),
        )
        .route("/proceed-checkout", post(checkout::checkout_redirect))
}

/// Build the full application router.
///
/// # Errors
///
/// Returns `SettingsError` if the settings cannot be read to decide whether
/// the store endpoints are enabled.
pub async fn register_routes(state: AppState) -> Result<Router, SettingsError> {
    let settings = state.settings().load().await?;
    let namespace = state.config().namespace.clone();

    let mut router = Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness));

    if settings.credentials().is_some() {
        tracing::info!(namespace = %namespace, "Store endpoints registered");
        router = router.nest(&namespace, commerce_routes());
    } else {
        tracing::warn!("Store API credentials not configured, store endpoints disabled");
    }

    let mut router = router
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }));

    if let Some(cors) = cors_layer(&state.config().cors_origins) {
        router = router.layer(cors);
    }

    Ok(router.with_state(state))
}

/// CORS for the configured app origins, or `None` when none are configured.
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_cors_without_origins() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&["bad\norigin".to_string()]).is_none());
    }

    #[test]
    fn test_cors_with_origins() {
        assert!(cors_layer(&["https://app.example.com".to_string()]).is_some());
    }
}
