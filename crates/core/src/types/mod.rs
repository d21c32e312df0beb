//! Core types for PWAcommerce.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the HTTP service and the CLI.

pub mod id;
pub mod line_item;
pub mod manifest;
pub mod query;

pub use id::*;
pub use line_item::{CartLineItem, LineItemError, parse_line_items};
pub use manifest::{MANIFEST_SIZES, Manifest, ManifestIcon};
pub use query::{ListQuery, OrderBy};
