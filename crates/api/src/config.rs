//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PWACOMMERCE_SITE_URL` - Public URL of the WooCommerce site (e.g., <https://shop.example.com>)
//!
//! ## Optional
//! - `PWACOMMERCE_HOST` - Bind address (default: 127.0.0.1)
//! - `PWACOMMERCE_PORT` - Listen port (default: 8080)
//! - `PWACOMMERCE_SITE_NAME` - App name shown in the manifest (default: PWAcommerce)
//! - `PWACOMMERCE_NAMESPACE` - Path prefix of the endpoints (default: /pwacommerce)
//! - `PWACOMMERCE_API_VERSION` - WooCommerce REST API version (default: wc/v2)
//! - `PWACOMMERCE_QUERY_STRING_AUTH` - Send API keys as query parameters (default: false)
//! - `PWACOMMERCE_SETTINGS_PATH` - JSON settings file (default: pwacommerce-settings.json)
//! - `PWACOMMERCE_UPLOADS_DIR` - Directory holding resized icons (default: uploads/pwacommerce)
//! - `PWACOMMERCE_UPLOADS_URL` - Public URL of that directory
//!   (default: `{site}/wp-content/uploads/pwacommerce`)
//! - `PWACOMMERCE_CHECKOUT_PATH` - Checkout page path on the site (default: /checkout/)
//! - `PWACOMMERCE_CORS_ORIGINS` - Comma-separated origins allowed to call the API
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_NAMESPACE: &str = "/pwacommerce";
const DEFAULT_API_VERSION: &str = "wc/v2";
const UPLOADS_SUBPATH: &str = "wp-content/uploads/pwacommerce";

/// Settings file used when `PWACOMMERCE_SETTINGS_PATH` is unset.
pub const DEFAULT_SETTINGS_PATH: &str = "pwacommerce-settings.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Site URL, always ending in `/`
    pub site_url: Url,
    /// App name used for the manifest
    pub site_name: String,
    /// Path prefix the endpoints are nested under
    pub namespace: String,
    /// WooCommerce REST API options
    pub woocommerce: WooCommerceConfig,
    /// Location of the stored settings
    pub settings_path: PathBuf,
    /// Where resized icons live
    pub uploads: UploadsConfig,
    /// Checkout page path, relative to the site URL
    pub checkout_path: String,
    /// Origins allowed by CORS; empty disables the CORS layer
    pub cors_origins: Vec<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Error event sample rate
    pub sentry_sample_rate: f32,
    /// Transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// WooCommerce REST API options.
#[derive(Debug, Clone)]
pub struct WooCommerceConfig {
    /// REST API version path (e.g., wc/v2)
    pub api_version: String,
    /// Authenticate with query parameters instead of HTTP basic auth
    pub query_string_auth: bool,
}

/// Upload directory configuration.
#[derive(Debug, Clone)]
pub struct UploadsConfig {
    /// Directory on disk
    pub dir: PathBuf,
    /// Public URL of `dir`, without a trailing `/`
    pub base_url: String,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let host = vars
            .or_default("PWACOMMERCE_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("PWACOMMERCE_HOST", e))?;
        let port = vars
            .or_default("PWACOMMERCE_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| invalid("PWACOMMERCE_PORT", e))?;
        let site_url = parse_site_url(&vars.required("PWACOMMERCE_SITE_URL")?)?;
        let site_name = vars.or_default("PWACOMMERCE_SITE_NAME", "PWAcommerce");
        let namespace = parse_namespace(&vars.or_default("PWACOMMERCE_NAMESPACE", DEFAULT_NAMESPACE))?;

        let woocommerce = WooCommerceConfig {
            api_version: vars
                .or_default("PWACOMMERCE_API_VERSION", DEFAULT_API_VERSION)
                .trim_matches('/')
                .to_string(),
            query_string_auth: parse_bool(
                "PWACOMMERCE_QUERY_STRING_AUTH",
                &vars.or_default("PWACOMMERCE_QUERY_STRING_AUTH", "false"),
            )?,
        };

        let settings_path =
            PathBuf::from(vars.or_default("PWACOMMERCE_SETTINGS_PATH", DEFAULT_SETTINGS_PATH));

        let uploads = UploadsConfig {
            dir: PathBuf::from(vars.or_default("PWACOMMERCE_UPLOADS_DIR", "uploads/pwacommerce")),
            base_url: vars
                .optional("PWACOMMERCE_UPLOADS_URL")
                .unwrap_or_else(|| format!("{site_url}{UPLOADS_SUBPATH}"))
                .trim_end_matches('/')
                .to_string(),
        };

        let checkout_path = vars.or_default("PWACOMMERCE_CHECKOUT_PATH", "/checkout/");

        let cors_origins = vars
            .optional("PWACOMMERCE_CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let sentry_sample_rate = vars
            .or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| invalid("SENTRY_SAMPLE_RATE", e))?;
        let sentry_traces_sample_rate = vars
            .or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")
            .parse::<f32>()
            .map_err(|e| invalid("SENTRY_TRACES_SAMPLE_RATE", e))?;

        Ok(Self {
            host,
            port,
            site_url,
            site_name,
            namespace,
            woocommerce,
            settings_path,
            uploads,
            checkout_path,
            cors_origins,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// The site's home URL, without a trailing `/`.
    #[must_use]
    pub fn home_url(&self) -> String {
        self.site_url.as_str().trim_end_matches('/').to_string()
    }

    /// Resolve a path relative to the site URL.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be joined onto the site URL.
    pub fn site_endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        self.site_url.join(path.trim_start_matches('/'))
    }

    /// Absolute URL of the site's checkout page.
    #[must_use]
    pub fn checkout_url(&self) -> String {
        self.site_endpoint(&self.checkout_path)
            .map_or_else(|_| format!("{}/checkout/", self.home_url()), String::from)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

fn invalid(key: &str, err: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

/// Parse the site URL and make sure relative joins land beneath it.
fn parse_site_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw).map_err(|e| invalid("PWACOMMERCE_SITE_URL", e))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("PWACOMMERCE_SITE_URL", "scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("PWACOMMERCE_SITE_URL", "missing host"));
    }

    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_namespace(raw: &str) -> Result<String, ConfigError> {
    let namespace = raw.trim();
    if !namespace.starts_with('/') || namespace == "/" || namespace.ends_with('/') {
        return Err(invalid(
            "PWACOMMERCE_NAMESPACE",
            "must start with '/', must not end with '/' and must not be '/'",
        ));
    }
    Ok(namespace.to_string())
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(invalid(key, format!("expected a boolean, got '{other}'"))),
    }
}
