//! Resolves uploaded files to their public URLs.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;

use crate::config::UploadsConfig;

/// Maps an uploaded file name to the URL it is served from.
#[async_trait]
pub trait UploadResolver: Send + Sync {
    /// The public URL of `file_name`, or `None` if no such upload exists.
    async fn file_url(&self, file_name: &str) -> Option<String>;
}

/// Uploads stored in a local directory and served under a fixed base URL.
#[derive(Debug, Clone)]
pub struct LocalUploads {
    dir: PathBuf,
    base_url: String,
}

impl LocalUploads {
    #[must_use]
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl UploadResolver for LocalUploads {
    async fn file_url(&self, file_name: &str) -> Option<String> {
        if !is_plain_file_name(file_name) {
            tracing::debug!(file_name, "Refusing to resolve upload outside the uploads directory");
            return None;
        }

        match tokio::fs::try_exists(self.dir.join(file_name)).await {
            Ok(true) => Some(format!("{}/{file_name}", self.base_url)),
            Ok(false) => None,
            Err(e) => {
                tracing::warn!(file_name, error = %e, "Failed to check upload");
                None
            }
        }
    }
}

/// A single normal path component: no separators, no `..`, not empty.
fn is_plain_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn uploads(dir: &Path) -> LocalUploads {
        LocalUploads::new(&UploadsConfig {
            dir: dir.to_path_buf(),
            base_url: "https://shop.test/wp-content/uploads/pwacommerce/".to_string(),
        })
    }

    #[tokio::test]
    async fn test_existing_file_resolves() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("96logo.png"), b"png").unwrap();

        assert_eq!(
            uploads(dir.path()).file_url("96logo.png").await.as_deref(),
            Some("https://shop.test/wp-content/uploads/pwacommerce/96logo.png")
        );
    }

    #[tokio::test]
    async fn test_missing_file_does_not_resolve() {
        let dir = tempfile::tempdir().unwrap();
        assert!(uploads(dir.path()).file_url("48logo.png").await.is_none());
    }

    #[tokio::test]
    async fn test_traversal_does_not_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let inner = dir.path().join("inner");
        std::fs::create_dir(&inner).unwrap();
        std::fs::write(dir.path().join("secret.png"), b"png").unwrap();

        let resolver = uploads(&inner);
        assert!(resolver.file_url("../secret.png").await.is_none());
        assert!(resolver.file_url("..").await.is_none());
        assert!(resolver.file_url("").await.is_none());
        assert!(resolver.file_url("a/b.png").await.is_none());
    }

    #[test]
    fn test_plain_file_names() {
        assert!(is_plain_file_name("192logo.png"));
        assert!(!is_plain_file_name("/etc/passwd"));
        assert!(!is_plain_file_name("dir\\file.png"));
    }
}
