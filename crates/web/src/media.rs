//! Local storage for uploaded book covers.
//!
//! Files live under `MEDIA_ROOT` and are referenced from the database by a
//! path relative to it (`covers/<uuid>.<ext>`). The router serves the root at
//! [`MEDIA_URL`].

use std::path::{Component, Path, PathBuf};

use image::ImageFormat;
use uuid::Uuid;

/// URL prefix under which `MEDIA_ROOT` is served.
pub const MEDIA_URL: &str = "/media";

/// Subdirectory for cover images.
pub const COVERS_DIR: &str = "covers";

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Upload a valid image. The file you uploaded was either not an image or a corrupted image.")]
    UnsupportedImage,

    #[error("Media path escapes the media root: {0}")]
    InvalidPath(String),

    #[error("Media storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Detect the image type from the file's leading bytes.
///
/// Returns the file extension to store it under. Only PNG, JPEG, GIF and WebP
/// are accepted; the client-supplied filename and content type are ignored.
pub fn sniff_image(bytes: &[u8]) -> Result<&'static str, MediaError> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Ok("png"),
        Ok(ImageFormat::Jpeg) => Ok("jpg"),
        Ok(ImageFormat::Gif) => Ok("gif"),
        Ok(ImageFormat::WebP) => Ok("webp"),
        _ => Err(MediaError::UnsupportedImage),
    }
}

/// Filesystem-backed media storage rooted at `MEDIA_ROOT`.
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

    /// Create the media directories if they do not exist yet.
    pub async fn ensure_dirs(&self) -> Result<(), MediaError> {
        tokio::fs::create_dir_all(self.root.join(COVERS_DIR)).await?;
        Ok(())
    }

    /// Store a cover image under a fresh random name, returning its relative path.
    pub async fn save_cover(&self, bytes: &[u8]) -> Result<String, MediaError> {
        let ext = sniff_image(bytes)?;
        self.ensure_dirs().await?;

        let relative = format!("{COVERS_DIR}/{}.{ext}", Uuid::new_v4());
        tokio::fs::write(self.root.join(&relative), bytes).await?;
        tracing::debug!(path = %relative, size = bytes.len(), "Stored cover image");
        Ok(relative)
    }

    /// Remove a stored file. A file that is already gone is not an error.
    pub async fn delete(&self, relative: &str) -> Result<(), MediaError> {
        let path = self.resolve(relative)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a stored file, logging instead of failing. Used once the
    /// database change that orphaned the file has already been committed.
    pub async fn delete_quietly(&self, relative: &str) {
        if let Err(e) = self.delete(relative).await {
            tracing::warn!(path = %relative, error = %e, "Failed to remove media file");
        }
    }

    /// Absolute path of a stored file; rejects anything but plain relative paths.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, MediaError> {
        let path = Path::new(relative);
        if relative.is_empty() || !path.components().all(|c| matches!(c, Component::Normal(_))) {
            return Err(MediaError::InvalidPath(relative.to_string()));
        }
        Ok(self.root.join(path))
    }
}

/// Public URL of a stored file.
pub fn url(relative: &str) -> String {
    format!("{MEDIA_URL}/{relative}")
}
