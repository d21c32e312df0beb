//! PWAcommerce CLI - Settings and diagnostics tools.
//!
//! # Usage
//!
//! ```bash
//! # Show the stored settings (secret redacted)
//! pwa-cli settings show
//!
//! # Store the WooCommerce REST API keys
//! pwa-cli settings set consumer_key ck_...
//! pwa-cli settings set consumer_secret cs_...
//!
//! # Forget the uploaded icon
//! pwa-cli settings unset icon
//!
//! # Print the web app manifest the API would serve
//! pwa-cli manifest
//!
//! # Verify the store answers with the stored credentials
//! pwa-cli check
//! ```
//!
//! # Commands
//!
//! - `settings` - Read and edit the settings file
//! - `manifest` - Print the web app manifest
//! - `check` - Test the store connection

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pwa-cli")]
#[command(author, version, about = "PWAcommerce CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read and edit the stored settings
    Settings {
        /// Settings file (default: `PWACOMMERCE_SETTINGS_PATH` or pwacommerce-settings.json)
        #[arg(short, long, global = true)]
        path: Option<PathBuf>,

        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Print the web app manifest
    Manifest,
    /// Check that the store answers with the stored credentials
    Check,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print all settings with the consumer secret redacted
    Show,
    /// Set a setting
    Set {
        /// Setting name (`consumer_key`, `consumer_secret`, `icon`)
        key: String,
        /// New value
        value: String,
    },
    /// Remove a setting
    Unset {
        /// Setting name
        key: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Settings { path, action } => {
            let store = commands::settings::store(path);
            match action {
                SettingsAction::Show => commands::settings::show(&store).await?,
                SettingsAction::Set { key, value } => {
                    commands::settings::set(&store, &key, &value).await?;
                }
                SettingsAction::Unset { key } => commands::settings::unset(&store, &key).await?,
            }
        }
        Commands::Manifest => commands::manifest::print().await?,
        Commands::Check => commands::check::run().await?,
    }
    Ok(())
}
