//! Web app manifest assembly.

use pwacommerce_core::{MANIFEST_SIZES, Manifest, ManifestIcon};

use crate::config::ApiConfig;
use crate::settings::Settings;
use crate::uploads::UploadResolver;

/// Build the manifest for the site.
///
/// When an icon has been uploaded, every resized variant that exists is
/// listed, smallest first; sizes that were never generated are left out.
pub async fn build_manifest(
    config: &ApiConfig,
    settings: &Settings,
    uploads: &dyn UploadResolver,
) -> Manifest {
    let mut manifest = Manifest::new(&config.site_name, &config.home_url());

    if let Some(icon) = settings.icon() {
        let mut icons = Vec::new();
        for size in MANIFEST_SIZES {
            if let Some(src) = uploads.file_url(&Manifest::sized_icon_name(size, icon)).await {
                icons.push(ManifestIcon::png(src, size));
            }
        }
        tracing::debug!(icon, variants = icons.len(), "Resolved manifest icons");
        manifest.icons = Some(icons);
    }

    manifest
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;

    use super::*;
    use crate::settings::ICON;

    struct KnownUploads(HashSet<&'static str>);

    #[async_trait]
    impl UploadResolver for KnownUploads {
        async fn file_url(&self, file_name: &str) -> Option<String> {
            self.0
                .contains(file_name)
                .then(|| format!("https://cdn.test/{file_name}"))
        }
    }

    fn config() -> ApiConfig {
        ApiConfig::from_lookup(|key| match key {
            "PWACOMMERCE_SITE_URL" => Some("https://shop.test".to_string()),
            "PWACOMMERCE_SITE_NAME" => Some("Shop".to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_only_resolved_sizes_are_listed_in_order() {
        let settings: Settings = [(ICON, "logo.png")].into_iter().collect();
        let uploads = KnownUploads(["192logo.png", "96logo.png"].into_iter().collect());

        let manifest = build_manifest(&config(), &settings, &uploads).await;

        let icons = manifest.icons.unwrap();
        assert_eq!(
            icons,
            vec![
                ManifestIcon::png("https://cdn.test/96logo.png", 96),
                ManifestIcon::png("https://cdn.test/192logo.png", 192),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_icon_setting_means_no_icons_key() {
        let uploads = KnownUploads(["96logo.png"].into_iter().collect());

        let manifest = build_manifest(&config(), &Settings::default(), &uploads).await;

        assert!(manifest.icons.is_none());
        assert_eq!(manifest.name, "Shop");
        assert_eq!(manifest.short_name, "Shop");
        assert_eq!(manifest.start_url, "https://shop.test");
    }

    #[tokio::test]
    async fn test_icon_without_variants_gives_empty_list() {
        let settings: Settings = [(ICON, "logo.png")].into_iter().collect();

        let manifest = build_manifest(&config(), &settings, &KnownUploads(HashSet::new())).await;

        assert_eq!(manifest.icons, Some(Vec::new()));
    }
}
