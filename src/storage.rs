//! Blob storage seam for profile pictures.
//!
//! Uploaded images are written under `<folder>/<uuid>.jpg` and addressed by a URL made of
//! the storage base URL and that relative path.

use crate::errors::{Error, Result};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument};
use uuid::Uuid;

/// Object storage operations used by the session store.
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Stores `data` as a new image in `folder` and returns its URL.
    async fn upload_image(&self, data: &[u8], folder: &str) -> Result<String>;

    /// Removes the image stored at `url`.
    async fn delete_image(&self, url: &str) -> Result<()>;
}

/// Blob storage on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalBlobStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalBlobStorage {
    /// Stores blobs below `root`; URLs are `base_url` followed by the relative path.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Maps a URL handed out by this storage back to its file.
    fn path_for_url(&self, url: &str) -> Result<PathBuf> {
        let relative = url
            .strip_prefix(&self.base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| Error::Storage {
                message: format!("URL {url} does not belong to this storage"),
            })?;

        let relative = Path::new(relative);
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            return Err(Error::Storage {
                message: format!("URL {url} escapes the storage root"),
            });
        }

        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStorage for LocalBlobStorage {
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    async fn upload_image(&self, data: &[u8], folder: &str) -> Result<String> {
        if data.is_empty() {
            return Err(Error::Storage {
                message: "image data is empty".to_string(),
            });
        }
        let folder = folder.trim_matches('/');
        if folder.is_empty() || folder.split('/').any(|part| part.is_empty() || part == "..") {
            return Err(Error::Storage {
                message: format!("invalid folder {folder:?}"),
            });
        }

        let file_name = format!("{}.jpg", Uuid::new_v4());
        let directory = self.root.join(folder);
        tokio::fs::create_dir_all(&directory).await?;
        tokio::fs::write(directory.join(&file_name), data).await?;

        let url = format!("{}/{folder}/{file_name}", self.base_url);
        debug!("Stored image at {}", url);
        Ok(url)
    }

    #[instrument(skip(self))]
    async fn delete_image(&self, url: &str) -> Result<()> {
        let path = self.path_for_url(url)?;
        tokio::fs::remove_file(&path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_storage() -> (LocalBlobStorage, PathBuf) {
        let root = std::env::temp_dir().join(format!("medistock-blobs-{}", Uuid::new_v4()));
        (
            LocalBlobStorage::new(&root, "https://blobs.test.app/"),
            root,
        )
    }

    #[tokio::test]
    async fn test_upload_then_delete() -> Result<()> {
        let (storage, root) = temp_storage();

        let url = storage.upload_image(b"jpeg bytes", "profile_images").await?;
        assert!(url.starts_with("https://blobs.test.app/profile_images/"));
        assert!(url.ends_with(".jpg"));

        let path = storage.path_for_url(&url)?;
        assert_eq!(tokio::fs::read(&path).await?, b"jpeg bytes");

        storage.delete_image(&url).await?;
        assert!(!path.exists());

        tokio::fs::remove_dir_all(root).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_each_upload_gets_a_new_name() -> Result<()> {
        let (storage, root) = temp_storage();
        let first = storage.upload_image(b"a", "profile_images").await?;
        let second = storage.upload_image(b"a", "profile_images").await?;
        assert_ne!(first, second);
        tokio::fs::remove_dir_all(root).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_rejects_empty_data_and_bad_folder() {
        let (storage, _root) = temp_storage();
        assert!(matches!(
            storage.upload_image(b"", "profile_images").await,
            Err(Error::Storage { message: _ })
        ));
        assert!(matches!(
            storage.upload_image(b"x", "../outside").await,
            Err(Error::Storage { message: _ })
        ));
    }

    #[tokio::test]
    async fn test_delete_rejects_foreign_urls() {
        let (storage, _root) = temp_storage();
        assert!(matches!(
            storage.delete_image("https://elsewhere.app/x.jpg").await,
            Err(Error::Storage { message: _ })
        ));
        assert!(matches!(
            storage
                .delete_image("https://blobs.test.app/../etc/passwd")
                .await,
            Err(Error::Storage { message: _ })
        ));
    }
}
