//! Query parameters for list endpoints of the remote store API.

use serde::Serialize;

use crate::types::CategoryId;

/// Page size used for every "all of it" listing.
pub const FULL_PAGE: u32 = 100;

/// Page size of the latest-products fallback listing.
pub const LATEST_PAGE: u32 = 10;

/// Sort key accepted by the remote list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    /// Newest first, by publication date.
    Date,
}

/// Query string for a remote list call.
///
/// Unset fields are left out of the serialized query entirely, so the remote
/// API falls back to its own defaults for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orderby: Option<OrderBy>,
}

impl ListQuery {
    /// No parameters at all.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Product categories, one full page.
    #[must_use]
    pub fn categories() -> Self {
        Self {
            per_page: Some(FULL_PAGE),
            ..Self::default()
        }
    }

    /// Newest products in a single category.
    #[must_use]
    pub fn by_category(category: CategoryId) -> Self {
        Self {
            category: Some(category),
            per_page: Some(FULL_PAGE),
            orderby: Some(OrderBy::Date),
            ..Self::default()
        }
    }

    /// Newest featured products.
    #[must_use]
    pub fn featured() -> Self {
        Self {
            featured: Some(true),
            per_page: Some(FULL_PAGE),
            orderby: Some(OrderBy::Date),
            ..Self::default()
        }
    }

    /// The ten most recently added products.
    #[must_use]
    pub fn latest() -> Self {
        Self {
            per_page: Some(LATEST_PAGE),
            orderby: Some(OrderBy::Date),
            ..Self::default()
        }
    }

    /// Newest reviews of a product.
    #[must_use]
    pub fn reviews() -> Self {
        Self {
            per_page: Some(FULL_PAGE),
            orderby: Some(OrderBy::Date),
            ..Self::default()
        }
    }

    /// Variations of a product, one full page.
    #[must_use]
    pub fn variations() -> Self {
        Self::categories()
    }
}
