//! Catalog route handlers.
//!
//! Each handler acquires a store client for the current credentials and
//! returns the store's JSON unchanged.

use axum::{
    Json,
    extract::{Query, State},
};
use pwacommerce_core::CategoryId;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use super::extract::NumericId;
use crate::error::Result;
use crate::services::catalog;
use crate::state::AppState;

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductsQuery {
    #[serde(rename = "categId")]
    pub categ_id: Option<u64>,
}

/// List up to 100 product categories.
#[instrument(skip(state))]
pub async fn view_categories(State(state): State<AppState>) -> Result<Json<Value>> {
    let api = state.commerce().await?;
    Ok(Json(catalog::categories(api.as_ref()).await?))
}

/// List products of a category, or the featured/latest products.
#[instrument(skip(state))]
pub async fn view_products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<Value>> {
    let api = state.commerce().await?;
    let category = query.categ_id.map(CategoryId::new);
    Ok(Json(catalog::products(api.as_ref(), category).await?))
}

/// Show a single product.
#[instrument(skip(state))]
pub async fn view_product(
    State(state): State<AppState>,
    NumericId(id): NumericId,
) -> Result<Json<Value>> {
    let api = state.commerce().await?;
    Ok(Json(catalog::product(api.as_ref(), id).await?))
}

/// List a product's newest reviews.
#[instrument(skip(state))]
pub async fn view_reviews(
    State(state): State<AppState>,
    NumericId(id): NumericId,
) -> Result<Json<Value>> {
    let api = state.commerce().await?;
    Ok(Json(catalog::reviews(api.as_ref(), id).await?))
}

/// List a product's variations.
#[instrument(skip(state))]
pub async fn view_product_variations(
    State(state): State<AppState>,
    NumericId(id): NumericId,
) -> Result<Json<Value>> {
    let api = state.commerce().await?;
    Ok(Json(catalog::variations(api.as_ref(), id).await?))
}
