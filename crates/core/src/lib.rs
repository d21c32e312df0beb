//! PWAcommerce Core - Shared types library.
//!
//! This crate provides the types used across all PWAcommerce components:
//! - `api` - HTTP service that fronts the store's WooCommerce REST API
//! - `cli` - Command-line tools for settings and diagnostics
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, remote list queries, the web app manifest and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
