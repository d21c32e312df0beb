//! Cart line items submitted by the checkout hand-off.
//!
//! The app posts its local cart as a JSON-encoded array of objects:
//!
//! ```json
//! [{"id": 12, "quantity": 2}, {"id": 31, "quantity": 1, "variationId": 40}]
//! ```
//!
//! Decoding is lenient by contract: a payload that is not a JSON array yields
//! no items, and elements that fail validation are dropped rather than
//! reported.

use serde_json::Value;
use thiserror::Error;

use crate::types::{ProductId, VariationId};

/// Why a single line item was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineItemError {
    #[error("element is not an object")]
    NotAnObject,
    #[error("missing field `{0}`")]
    Missing(&'static str),
    #[error("field `{0}` is not numeric")]
    NotNumeric(&'static str),
    #[error("field `{0}` must be a positive integer")]
    NotPositive(&'static str),
    #[error("field `{0}` is out of range")]
    OutOfRange(&'static str),
}

/// A validated request to add a product (or one of its variations) to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub variation_id: Option<VariationId>,
}

impl CartLineItem {
    /// A simple (non-variable) product line.
    #[must_use]
    pub const fn simple(product_id: u64, quantity: u32) -> Self {
        Self {
            product_id: ProductId::new(product_id),
            quantity,
            variation_id: None,
        }
    }

    /// A line for a specific variation of a variable product.
    #[must_use]
    pub const fn variation(product_id: u64, quantity: u32, variation_id: u64) -> Self {
        Self {
            product_id: ProductId::new(product_id),
            quantity,
            variation_id: Some(VariationId::new(variation_id)),
        }
    }

    /// Validate one element of the submitted array.
    ///
    /// `id` and `quantity` are required and must be positive integers, given
    /// either as JSON numbers or as numeric strings. A `variationId` that is
    /// missing, non-numeric or zero is ignored and the line is treated as a
    /// simple product.
    ///
    /// # Errors
    ///
    /// Returns `LineItemError` naming the first field that failed validation.
    pub fn from_value(value: &Value) -> Result<Self, LineItemError> {
        let object = value.as_object().ok_or(LineItemError::NotAnObject)?;

        let id = required(object.get("id"), "id")?;
        let quantity = required(object.get("quantity"), "quantity")?;
        let quantity = u32::try_from(quantity).map_err(|_| LineItemError::OutOfRange("quantity"))?;

        let variation_id = object
            .get("variationId")
            .and_then(|v| positive_integer(v, "variationId").ok())
            .map(VariationId::new);

        Ok(Self {
            product_id: ProductId::new(id),
            quantity,
            variation_id,
        })
    }
}

/// Decode the `items` payload into the valid line items, in submission order.
///
/// Never fails: malformed JSON or a non-array top level produce an empty list,
/// and invalid elements are skipped.
#[must_use]
pub fn parse_line_items(payload: &str) -> Vec<CartLineItem> {
    let value: Value = match serde_json::from_str(payload) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "Checkout items payload is not valid JSON");
            return Vec::new();
        }
    };

    let Value::Array(elements) = value else {
        tracing::debug!("Checkout items payload is not an array");
        return Vec::new();
    };

    elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| match CartLineItem::from_value(element) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!(index, reason = %e, "Skipping invalid checkout line item");
                None
            }
        })
        .collect()
}

fn required(value: Option<&Value>, field: &'static str) -> Result<u64, LineItemError> {
    match value {
        None | Some(Value::Null) => Err(LineItemError::Missing(field)),
        Some(v) => positive_integer(v, field),
    }
}

/// Interpret a JSON number or numeric string as a positive integer.
fn positive_integer(value: &Value, field: &'static str) -> Result<u64, LineItemError> {
    let number = match value {
        Value::Number(n) => n
            .as_u64()
            .map(Numeric::Integer)
            .or_else(|| n.as_i64().map(|_| Numeric::Negative))
            .or_else(|| n.as_f64().map(Numeric::Float)),
        Value::String(s) => parse_numeric_str(s.trim()),
        _ => None,
    };

    match number.ok_or(LineItemError::NotNumeric(field))? {
        Numeric::Integer(0) | Numeric::Negative => Err(LineItemError::NotPositive(field)),
        Numeric::Integer(n) => Ok(n),
        Numeric::Float(f) => float_to_positive(f, field),
    }
}

enum Numeric {
    Integer(u64),
    Negative,
    Float(f64),
}

fn parse_numeric_str(s: &str) -> Option<Numeric> {
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<u64>() {
        return Some(Numeric::Integer(n));
    }
    if s.parse::<i64>().is_ok() {
        return Some(Numeric::Negative);
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Numeric::Float)
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)] // bounds and integrality are checked before the cast
fn float_to_positive(f: f64, field: &'static str) -> Result<u64, LineItemError> {
    if f.fract() != 0.0 || f < 1.0 {
        return Err(LineItemError::NotPositive(field));
    }
    if f > u64::MAX as f64 {
        return Err(LineItemError::OutOfRange(field));
    }
    Ok(f as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mixed_payload_keeps_valid_items_in_order() {
        let payload = r#"[
            {"id": 1, "quantity": 2},
            {"id": "x", "quantity": 1},
            {"id": 3, "quantity": 1, "variationId": 7}
        ]"#;

        assert_eq!(
            parse_line_items(payload),
            vec![
                CartLineItem::simple(1, 2),
                CartLineItem::variation(3, 1, 7)
            ]
        );
    }

    #[test]
    fn test_invalid_json_yields_no_items() {
        assert!(parse_line_items("not valid json").is_empty());
        assert!(parse_line_items("").is_empty());
    }

    #[test]
    fn test_non_array_top_level_yields_no_items() {
        assert!(parse_line_items(r#"{"id": 1, "quantity": 1}"#).is_empty());
        assert!(parse_line_items("null").is_empty());
        assert!(parse_line_items("42").is_empty());
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let item = CartLineItem::from_value(&json!({"id": "12", "quantity": " 3 "}));
        assert_eq!(item, Ok(CartLineItem::simple(12, 3)));
    }

    #[test]
    fn test_integral_floats_are_accepted() {
        let item = CartLineItem::from_value(&json!({"id": 5.0, "quantity": 2}));
        assert_eq!(item, Ok(CartLineItem::simple(5, 2)));
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        assert_eq!(
            CartLineItem::from_value(&json!({"quantity": 1})),
            Err(LineItemError::Missing("id"))
        );
        assert_eq!(
            CartLineItem::from_value(&json!({"id": 1})),
            Err(LineItemError::Missing("quantity"))
        );
        assert_eq!(
            CartLineItem::from_value(&json!({"id": null, "quantity": 1})),
            Err(LineItemError::Missing("id"))
        );
    }

    #[test]
    fn test_non_numeric_fields_are_rejected() {
        assert_eq!(
            CartLineItem::from_value(&json!({"id": "x", "quantity": 1})),
            Err(LineItemError::NotNumeric("id"))
        );
        assert_eq!(
            CartLineItem::from_value(&json!({"id": 1, "quantity": true})),
            Err(LineItemError::NotNumeric("quantity"))
        );
        assert_eq!(
            CartLineItem::from_value(&json!([1, 2])),
            Err(LineItemError::NotAnObject)
        );
    }

    #[test]
    fn test_non_positive_values_are_rejected() {
        assert_eq!(
            CartLineItem::from_value(&json!({"id": 1, "quantity": 0})),
            Err(LineItemError::NotPositive("quantity"))
        );
        assert_eq!(
            CartLineItem::from_value(&json!({"id": -4, "quantity": 1})),
            Err(LineItemError::NotPositive("id"))
        );
        assert_eq!(
            CartLineItem::from_value(&json!({"id": 1, "quantity": 1.5})),
            Err(LineItemError::NotPositive("quantity"))
        );
    }

    #[test]
    fn test_oversized_quantity_is_rejected() {
        assert_eq!(
            CartLineItem::from_value(&json!({"id": 1, "quantity": 5_000_000_000_u64})),
            Err(LineItemError::OutOfRange("quantity"))
        );
    }

    #[test]
    fn test_unusable_variation_falls_back_to_simple_product() {
        for variation in [json!("abc"), json!(0), json!(null), json!(-2)] {
            let item =
                CartLineItem::from_value(&json!({"id": 8, "quantity": 1, "variationId": variation}));
            assert_eq!(item, Ok(CartLineItem::simple(8, 1)));
        }
    }

    #[test]
    fn test_duplicates_are_kept() {
        let items = parse_line_items(r#"[{"id":1,"quantity":1},{"id":1,"quantity":1}]"#);
        assert_eq!(items.len(), 2);
    }
}
