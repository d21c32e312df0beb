//! Web app manifest route handler.

use axum::{Json, extract::State};
use pwacommerce_core::Manifest;
use tracing::instrument;

use crate::error::Result;
use crate::services::manifest::build_manifest;
use crate::state::AppState;

/// Export the web app manifest.
#[instrument(skip(state))]
pub async fn export_manifest(State(state): State<AppState>) -> Result<Json<Manifest>> {
    let (settings, _) = state.enabled_settings().await?;
    let manifest = build_manifest(state.config(), &settings, state.uploads()).await;
    Ok(Json(manifest))
}
