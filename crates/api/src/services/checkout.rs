//! Hands the app's local cart over to the store.

use pwacommerce_core::CartLineItem;
use tracing::instrument;

use crate::error::add_breadcrumb;
use crate::woocommerce::CartSession;

/// Add `items` to the cart one at a time, in order.
///
/// A line the store refuses is logged and skipped; it neither stops the
/// remaining lines nor undoes earlier ones. Returns how many lines were added.
#[instrument(skip_all, fields(items = items.len()))]
pub async fn add_line_items(session: &mut dyn CartSession, items: &[CartLineItem]) -> usize {
    let mut added = 0;

    for item in items {
        match session.add_item(item).await {
            Ok(()) => {
                added += 1;
                let product = item.product_id.to_string();
                add_breadcrumb("cart", "Added line item", Some(&[("product_id", product.as_str())]));
            }
            Err(e) => {
                tracing::warn!(
                    product_id = %item.product_id,
                    variation_id = ?item.variation_id,
                    quantity = item.quantity,
                    error = %e,
                    "Store refused cart line item"
                );
            }
        }
    }

    tracing::info!(added, requested = items.len(), "Cart line items applied");
    added
}
