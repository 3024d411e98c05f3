//! Storage for uploaded recipe images.
//!
//! Handlers talk to the [`ImageStore`] trait; [`LocalImageStore`] keeps files
//! under the configured media directory, which the router serves at
//! `MEDIA_BASE_URL`.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use bakehouse_core::types::DbId;

use crate::config::ServerConfig;
use crate::error::AppError;

/// Image formats accepted for recipe photos.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Sub-directory of the media root holding recipe images.
pub const RECIPE_IMAGE_DIR: &str = "recipe_images";

#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("Unsupported image format '.{0}'. Supported: .png, .jpg, .jpeg, .webp")]
    UnsupportedFormat(String),

    #[error("Image is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("Uploaded image is empty")]
    Empty,

    #[error("Media storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::UnsupportedFormat(_) | MediaError::Empty => {
                AppError::BadRequest(err.to_string())
            }
            MediaError::TooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            MediaError::Io(e) => AppError::InternalError(e.to_string()),
        }
    }
}

/// Check an upload's file name and size, returning its lowercase extension.
pub fn validate_image(filename: &str, size: usize, limit: usize) -> Result<String, MediaError> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Err(MediaError::UnsupportedFormat(ext));
    }
    if size == 0 {
        return Err(MediaError::Empty);
    }
    if size > limit {
        return Err(MediaError::TooLarge { size, limit });
    }
    Ok(ext)
}

/// Blob storage for recipe images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the image for `recipe_id`, replacing any earlier one, and return
    /// the URL it is reachable at.
    async fn put_recipe_image(
        &self,
        recipe_id: DbId,
        extension: &str,
        bytes: &[u8],
    ) -> Result<String, MediaError>;

    /// Remove every stored image for `recipe_id`. Missing files are not an error.
    async fn remove_recipe_image(&self, recipe_id: DbId) -> Result<(), MediaError>;
}

/// [`ImageStore`] backed by the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    base_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.media_dir.clone(), config.media_base_url.clone())
    }

    fn image_dir(&self) -> PathBuf {
        self.root.join(RECIPE_IMAGE_DIR)
    }

    async fn remove_variants(&self, recipe_id: DbId, keep: Option<&str>) -> Result<(), MediaError> {
        for ext in SUPPORTED_IMAGE_EXTENSIONS.iter().filter(|e| Some(**e) != keep) {
            let path = self.image_dir().join(format!("{recipe_id}.{ext}"));
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "Removed recipe image"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn put_recipe_image(
        &self,
        recipe_id: DbId,
        extension: &str,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        let dir = self.image_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let file_name = format!("{recipe_id}.{extension}");
        tokio::fs::write(dir.join(&file_name), bytes).await?;
        // A re-upload in another format must not leave the old file behind.
        self.remove_variants(recipe_id, Some(extension)).await?;

        Ok(format!("{}/{RECIPE_IMAGE_DIR}/{file_name}", self.base_url))
    }

    async fn remove_recipe_image(&self, recipe_id: DbId) -> Result<(), MediaError> {
        self.remove_variants(recipe_id, None).await
    }
}
