//! Catalog reads passed straight through from the store.

use pwacommerce_core::{CategoryId, ListQuery, ProductId};
use serde_json::Value;
use tracing::instrument;

use crate::woocommerce::{CommerceApi, CommerceError};

/// Up to 100 product categories.
///
/// # Errors
///
/// Propagates any `CommerceError` from the store unchanged.
pub async fn categories(api: &dyn CommerceApi) -> Result<Value, CommerceError> {
    api.get("products/categories", &ListQuery::categories()).await
}

/// The product listing shown on the app's home and category screens.
///
/// 1. With a category, the newest 100 products in it.
/// 2. Otherwise the newest 100 featured products,
/// 3. unless there are none, in which case the 10 newest products.
///
/// # Errors
///
/// Propagates any `CommerceError` from the store unchanged.
#[instrument(skip(api))]
pub async fn products(
    api: &dyn CommerceApi,
    category: Option<CategoryId>,
) -> Result<Value, CommerceError> {
    if let Some(category) = category {
        return api.get("products", &ListQuery::by_category(category)).await;
    }

    let featured = api.get("products", &ListQuery::featured()).await?;
    if !is_empty_listing(&featured) {
        return Ok(featured);
    }

    tracing::debug!("No featured products, falling back to latest products");
    api.get("products", &ListQuery::latest()).await
}

/// A single product.
///
/// # Errors
///
/// Propagates any `CommerceError` from the store unchanged.
pub async fn product(api: &dyn CommerceApi, id: ProductId) -> Result<Value, CommerceError> {
    api.get(&format!("products/{id}"), &ListQuery::none()).await
}

/// Up to 100 of a product's newest reviews.
///
/// # Errors
///
/// Propagates any `CommerceError` from the store unchanged.
pub async fn reviews(api: &dyn CommerceApi, id: ProductId) -> Result<Value, CommerceError> {
    api.get(&format!("products/{id}/reviews"), &ListQuery::reviews())
        .await
}

/// Up to 100 variations of a product.
///
/// # Errors
///
/// Propagates any `CommerceError` from the store unchanged.
pub async fn variations(api: &dyn CommerceApi, id: ProductId) -> Result<Value, CommerceError> {
    api.get(&format!("products/{id}/variations"), &ListQuery::variations())
        .await
}

/// `null` and `[]` count as "nothing found"; any other body is a result.
fn is_empty_listing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
