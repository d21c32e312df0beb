//! Request extractors shared by the route handlers.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use pwacommerce_core::ProductId;

use crate::error::AppError;

/// A product id taken from the `{id}` path segment.
///
/// Only all-digit segments match, as with a `\d+` route pattern. Anything
/// else is answered like an unknown route (404), not as a bad argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericId(pub ProductId);

impl<S> FromRequestParts<S> for NumericId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(segment) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| not_found())?;

        parse_numeric(&segment)
            .map(|id| Self(ProductId::new(id)))
            .ok_or_else(not_found)
    }
}

fn parse_numeric(segment: &str) -> Option<u64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

fn not_found() -> AppError {
    AppError::NotFound("no route matches this path".to_string())
}
