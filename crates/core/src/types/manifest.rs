//! Web app manifest served to installable web app tooling.

use serde::{Deserialize, Serialize};

/// Square icon sizes, in pixels, that the manifest may advertise.
///
/// Ordered ascending; the manifest lists icons in this order.
pub const MANIFEST_SIZES: [u32; 9] = [48, 72, 96, 128, 144, 152, 192, 384, 512];

/// Theme and background color of the installed app.
pub const BRAND_COLOR: &str = "#a333c8";

/// A single icon variant in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl ManifestIcon {
    /// A square PNG icon of `size` pixels served from `src`.
    #[must_use]
    pub fn png(src: impl Into<String>, size: u32) -> Self {
        Self {
            src: src.into(),
            sizes: format!("{size}x{size}"),
            mime_type: "image/png".to_string(),
        }
    }
}

/// Web app manifest.
///
/// `icons` is `None` when no icon has been uploaded, which leaves the key out
/// of the JSON entirely. An uploaded icon with no resized variants on disk
/// yields `Some(vec![])`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    pub short_name: String,
    pub start_url: String,
    pub display: String,
    pub orientation: String,
    pub theme_color: String,
    pub background_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icons: Option<Vec<ManifestIcon>>,
}

impl Manifest {
    /// Create a manifest with the fixed display settings and no icons.
    #[must_use]
    pub fn new(site_name: &str, start_url: &str) -> Self {
        Self {
            name: site_name.to_string(),
            short_name: site_name.to_string(),
            start_url: start_url.to_string(),
            display: "standalone".to_string(),
            orientation: "any".to_string(),
            theme_color: BRAND_COLOR.to_string(),
            background_color: BRAND_COLOR.to_string(),
            icons: None,
        }
    }

    /// File name of the resized variant of `icon` for a given size.
    ///
    /// Resized icons are stored with the pixel size prepended to the
    /// original file name, e.g. `192logo.png`.
    #[must_use]
    pub fn sized_icon_name(size: u32, icon: &str) -> String {
        format!("{size}{icon}")
    }
}
