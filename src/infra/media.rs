//! Files under the media directory: product images and the home page gallery.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use crate::config::{
    GALLERY_EXTENSIONS, GALLERY_SUBDIR, IMAGE_EXTENSIONS, MAX_IMAGE_UPLOAD_BYTES,
    PRODUCT_IMAGE_SUBDIR,
};
use crate::errors::{AppError, AppResult};

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

/// Extension of `name`, lowercased.
fn extension(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// Keep only the last path segment and replace anything unusual with `_`.
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original)
        .trim();
    let cleaned = UNSAFE_CHARS.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.chars().take(100).collect()
    }
}

/// A stored name must be a plain file inside its directory.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn product_dir(&self) -> PathBuf {
        self.root.join(PRODUCT_IMAGE_SUBDIR)
    }

    /// Reject uploads that are empty, too large or not an accepted image type.
    pub fn check_image(original_name: &str, size: usize) -> AppResult<()> {
        if size == 0 {
            return Err(AppError::validation("The uploaded file is empty"));
        }
        if size > MAX_IMAGE_UPLOAD_BYTES {
            return Err(AppError::validation(format!(
                "Image is too large (maximum {} MB)",
                MAX_IMAGE_UPLOAD_BYTES / (1024 * 1024)
            )));
        }
        match extension(original_name) {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
            _ => Err(AppError::validation(
                "Only JPG, JPEG, PNG and GIF images are allowed",
            )),
        }
    }

    /// Write an uploaded product image under a unique name and return that name.
    pub async fn save_product_image(&self, original_name: &str, data: &[u8]) -> AppResult<String> {
        Self::check_image(original_name, data.len())?;

        let dir = self.product_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let filename = format!("{}-{}", Uuid::new_v4(), sanitize_file_name(original_name));
        tokio::fs::write(dir.join(&filename), data).await?;

        tracing::debug!(filename = %filename, bytes = data.len(), "Stored product image");
        Ok(filename)
    }

    /// Delete a product image file. A file that is already gone is not an error.
    pub async fn remove_product_image(&self, filename: &str) -> AppResult<()> {
        if !is_plain_file_name(filename) {
            return Err(AppError::validation("Invalid image file name"));
        }
        match tokio::fs::remove_file(self.product_dir().join(filename)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(filename = %filename, "Product image already missing on disk");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort removal used after a product row is gone.
    pub async fn remove_product_images(&self, filenames: &[String]) {
        for filename in filenames {
            if let Err(e) = self.remove_product_image(filename).await {
                tracing::warn!(filename = %filename, error = %e, "Failed to remove product image");
            }
        }
    }

    /// Gallery files for the home page, sorted by name. A missing gallery
    /// directory yields an empty list.
    pub async fn gallery(&self) -> AppResult<Vec<String>> {
        let dir = self.root.join(GALLERY_SUBDIR);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') || !entry.file_type().await?.is_file() {
                continue;
            }
            if extension(&name).is_some_and(|ext| GALLERY_EXTENSIONS.contains(&ext.as_str())) {
                files.push(format!("/media/{}/{}", GALLERY_SUBDIR, name));
            }
        }
        files.sort();
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("ring photo (1).JPG"), "ring_photo_1_.JPG");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\photos\\a.png"), "a.png");
        assert_eq!(sanitize_file_name("..."), "image");
    }

    #[test]
    fn test_check_image() {
        assert!(MediaStore::check_image("a.jpeg", 10).is_ok());
        assert!(MediaStore::check_image("a.GIF", 10).is_ok());
        assert!(MediaStore::check_image("a.webp", 10).is_err());
        assert!(MediaStore::check_image("a.png", 0).is_err());
        assert!(MediaStore::check_image("a.png", MAX_IMAGE_UPLOAD_BYTES + 1).is_err());
    }

    #[tokio::test]
    async fn test_save_and_remove_product_image() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let name = store.save_product_image("ring.png", b"png-bytes").await.unwrap();
        assert!(name.ends_with("-ring.png"));
        let path = dir.path().join(PRODUCT_IMAGE_SUBDIR).join(&name);
        assert!(path.exists());

        store.remove_product_image(&name).await.unwrap();
        assert!(!path.exists());
        // Second removal is a no-op
        store.remove_product_image(&name).await.unwrap();
        assert!(store.remove_product_image("../secret").await.is_err());
    }

    #[tokio::test]
    async fn test_gallery_lists_media_only() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());
        assert!(store.gallery().await.unwrap().is_empty());

        let gallery = dir.path().join(GALLERY_SUBDIR);
        std::fs::create_dir_all(&gallery).unwrap();
        std::fs::write(gallery.join("b.mp4"), b"x").unwrap();
        std::fs::write(gallery.join("a.jpg"), b"x").unwrap();
        std::fs::write(gallery.join("notes.txt"), b"x").unwrap();
        std::fs::write(gallery.join(".hidden.jpg"), b"x").unwrap();

        assert_eq!(
            store.gallery().await.unwrap(),
            vec!["/media/gallery/a.jpg".to_string(), "/media/gallery/b.mp4".to_string()]
        );
    }
}
