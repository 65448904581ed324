//! Product image storage on the local filesystem.
//!
//! Files live in the configured upload directory under a generated
//! `<uuid>.<ext>` name and are referenced by their public path
//! `/static/uploads/<file>`, which the router serves from the same directory.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Public URL prefix of stored images.
pub const PUBLIC_PREFIX: &str = "/static/uploads/";

/// Extension used when the client filename has no usable one.
const DEFAULT_EXTENSION: &str = "bin";

/// Errors from image storage.
#[derive(Debug, Error)]
pub enum ImageStoreError {
    /// Reference is not one of ours or tries to leave the upload directory.
    #[error("invalid image reference: {0}")]
    InvalidReference(String),

    /// Filesystem failure.
    #[error("image storage error: {0}")]
    Io(#[from] io::Error),
}

/// Stores uploaded product images.
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `ImageStoreError::Io` if the directory cannot be created.
    pub async fn ensure_root(&self) -> Result<(), ImageStoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Write `bytes` under a fresh unique name and return its reference.
    ///
    /// Only the extension of `original_name` is kept.
    ///
    /// # Errors
    ///
    /// Returns `ImageStoreError::Io` if the write fails.
    pub async fn save(&self, bytes: &[u8], original_name: &str) -> Result<String, ImageStoreError> {
        self.ensure_root().await?;
        let file_name = format!("{}.{}", Uuid::new_v4(), extension_of(original_name));
        tokio::fs::write(self.root.join(&file_name), bytes).await?;

        tracing::debug!(file = %file_name, size = bytes.len(), "Stored product image");
        Ok(format!("{PUBLIC_PREFIX}{file_name}"))
    }

    /// Read the bytes behind a reference.
    ///
    /// # Errors
    ///
    /// Returns `ImageStoreError::InvalidReference` for a foreign reference and
    /// `ImageStoreError::Io` if the file is missing or unreadable.
    pub async fn read(&self, reference: &str) -> Result<Vec<u8>, ImageStoreError> {
        let path = self.path_of(reference)?;
        Ok(tokio::fs::read(path).await?)
    }

    /// Delete the file behind a reference, logging instead of failing.
    pub async fn remove(&self, reference: &str) {
        let path = match self.path_of(reference) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(reference = %reference, error = %e, "Skipping image removal");
                return;
            }
        };

        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove old product image"
            );
        }
    }

    /// Map a reference to a path inside the root.
    fn path_of(&self, reference: &str) -> Result<PathBuf, ImageStoreError> {
        let name = reference
            .strip_prefix(PUBLIC_PREFIX)
            .filter(|name| is_plain_file_name(name))
            .ok_or_else(|| ImageStoreError::InvalidReference(reference.to_owned()))?;
        Ok(self.root.join(name))
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

/// Lower-cased alphanumeric extension of `name`, or a fallback.
fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map_or_else(|| DEFAULT_EXTENSION.to_owned(), str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("sofa.JPG"), "jpg");
        assert_eq!(extension_of("door.webp"), "webp");
        assert_eq!(extension_of("no-extension"), "bin");
        assert_eq!(extension_of("evil.p/hp"), "bin");
        assert_eq!(extension_of("../../etc/passwd"), "bin");
    }

    #[tokio::test]
    async fn test_save_read_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let reference = store.save(b"wood grain", "bed.png").await.unwrap();
        assert!(reference.starts_with(PUBLIC_PREFIX));
        assert!(reference.ends_with(".png"));
        assert_eq!(store.read(&reference).await.unwrap(), b"wood grain");

        store.remove(&reference).await;
        assert!(matches!(
            store.read(&reference).await,
            Err(ImageStoreError::Io(_))
        ));
    }

    #[tokio::test]
    async fn test_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        let a = store.save(b"a", "x.jpg").await.unwrap();
        let b = store.save(b"b", "x.jpg").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_rejects_foreign_references() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());

        for reference in ["/etc/passwd", "/static/uploads/../secret", "/static/uploads/"] {
            assert!(matches!(
                store.read(reference).await,
                Err(ImageStoreError::InvalidReference(_))
            ));
        }
        // Missing files and bad references never panic or error.
        store.remove("/static/uploads/missing.jpg").await;
        store.remove("https://example.com/a.jpg").await;
    }
}
