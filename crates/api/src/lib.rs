//! PWAcommerce API library.
//!
//! Headless endpoints in front of a WooCommerce store, exposed as a library
//! so the router can be tested and driven from the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod settings;
pub mod state;
pub mod uploads;
pub mod woocommerce;
