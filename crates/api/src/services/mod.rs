//! Business logic behind the route handlers.
//!
//! # Services
//!
//! - `catalog` - Remote catalog reads, including the product listing fallback policy
//! - `checkout` - Applies a batch of cart line items to the shopper's cart
//! - `manifest` - Builds the web app manifest from settings and uploaded icons
//!
//! Services only depend on the collaborator traits (`CommerceApi`,
//! `CartSession`, `UploadResolver`), never on HTTP extractors, so they can be
//! exercised directly with in-memory implementations.

pub mod catalog;
pub mod checkout;
pub mod manifest;
