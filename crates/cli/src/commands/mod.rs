//! Subcommand implementations.

pub mod check;
pub mod manifest;
pub mod settings;
