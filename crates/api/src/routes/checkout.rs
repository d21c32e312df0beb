//! Checkout hand-off route handler.
//!
//! The app keeps its cart locally until the shopper is ready to pay. It then
//! posts the whole cart here; the lines are replayed into the shopper's cart
//! on the store and the shopper is redirected to the store's checkout page.

use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use pwacommerce_core::parse_line_items;
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::checkout::add_line_items;
use crate::state::AppState;

/// Name of the field carrying the JSON-encoded line items.
const ITEMS_FIELD: &str = "items";

/// Add the posted line items to the cart and redirect to checkout.
///
/// Malformed payloads and invalid lines are ignored; the redirect is issued
/// no matter how many lines made it into the cart.
#[instrument(skip_all)]
pub async fn checkout_redirect(
    State(state): State<AppState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response> {
    state.enabled_settings().await?;

    let payload = items_payload(&headers, query.as_deref(), &body).unwrap_or_default();
    let items = parse_line_items(&payload);
    tracing::debug!(valid_items = items.len(), "Decoded checkout items");

    let cookie_header = headers.get(header::COOKIE).and_then(|v| v.to_str().ok());

    let set_cookies = match state.cart().start_session(cookie_header).await {
        Ok(mut session) => {
            add_line_items(session.as_mut(), &items).await;
            session.set_cookies()
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not open cart session, redirecting with cart unchanged");
            Vec::new()
        }
    };

    let checkout_url = state.cart().checkout_url();
    let location = HeaderValue::from_str(&checkout_url)
        .map_err(|e| AppError::Internal(format!("invalid checkout URL {checkout_url}: {e}")))?;

    let mut response = (StatusCode::FOUND, [(header::LOCATION, location)]).into_response();
    for cookie in set_cookies {
        match HeaderValue::from_str(&cookie) {
            Ok(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            Err(e) => tracing::warn!(error = %e, "Dropping unrepresentable session cookie"),
        }
    }

    Ok(response)
}

/// Find the `items` field in the request.
///
/// Looks in an urlencoded form body, then a JSON body, then the query string.
fn items_payload(headers: &HeaderMap, query: Option<&str>, body: &[u8]) -> Option<String> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let from_body = if content_type.starts_with("application/x-www-form-urlencoded") {
        form_field(body)
    } else if content_type.starts_with("application/json") {
        json_field(body)
    } else {
        None
    };

    from_body.or_else(|| query.and_then(|q| form_field(q.as_bytes())))
}

fn form_field(encoded: &[u8]) -> Option<String> {
    url::form_urlencoded::parse(encoded)
        .find(|(key, _)| key == ITEMS_FIELD)
        .map(|(_, value)| value.into_owned())
}

/// `items` may be sent as the JSON-encoded string or as the array itself.
fn json_field(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get(ITEMS_FIELD)? {
        Value::String(encoded) => Some(encoded.clone()),
        items @ Value::Array(_) => Some(items.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_content_type(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(content_type).unwrap_or(HeaderValue::from_static("text/plain")),
        );
        headers
    }

    #[test]
    fn test_form_body() {
        let headers = with_content_type("application/x-www-form-urlencoded; charset=UTF-8");
        let body = b"foo=1&items=%5B%7B%22id%22%3A1%2C%22quantity%22%3A2%7D%5D";

        assert_eq!(
            items_payload(&headers, None, body).as_deref(),
            Some(r#"[{"id":1,"quantity":2}]"#)
        );
    }

    #[test]
    fn test_json_body_with_encoded_string() {
        let headers = with_content_type("application/json");
        let body = br#"{"items": "[{\"id\":3,\"quantity\":1}]"}"#;

        assert_eq!(
            items_payload(&headers, None, body).as_deref(),
            Some(r#"[{"id":3,"quantity":1}]"#)
        );
    }

    #[test]
    fn test_json_body_with_array() {
        let headers = with_content_type("application/json");
        let body = br#"{"items": [{"id":3,"quantity":1}]}"#;

        assert_eq!(
            items_payload(&headers, None, body).as_deref(),
            Some(r#"[{"id":3,"quantity":1}]"#)
        );
    }

    #[test]
    fn test_query_string_fallback() {
        let headers = HeaderMap::new();
        assert_eq!(
            items_payload(&headers, Some("items=%5B%5D"), b"").as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_missing_field() {
        let headers = with_content_type("application/x-www-form-urlencoded");
        assert!(items_payload(&headers, None, b"other=1").is_none());
        assert!(items_payload(&HeaderMap::new(), None, b"").is_none());
    }
}
