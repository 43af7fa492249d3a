//! Local image materialization.
//!
//! Saved recipes keep a copy of their image on disk so the saved-recipes page
//! does not depend on the provider's CDN staying up. One file per recipe id,
//! fixed extension, overwritten on re-save and deleted best-effort on unsave.

use std::path::{Path, PathBuf};

use reqwest::Client;
use tokio::fs;
use tracing::{info, warn};

use crate::error::AppError;

pub struct ImageMaterializer {
    http: Client,
    dir: PathBuf,
}

impl ImageMaterializer {
    pub fn new(http: Client, dir: PathBuf) -> Self {
        Self { http, dir }
    }

    /// Deterministic on-disk location for a recipe's image.
    pub fn image_path(&self, recipe_id: &str) -> PathBuf {
        self.dir.join(format!("{recipe_id}.jpg"))
    }

    /// Downloads the remote image and persists it under the recipe's path.
    ///
    /// Network and filesystem failures surface as [`AppError::ImageDownload`];
    /// the caller decides whether the save proceeds.
    pub async fn persist(&self, recipe_id: &str, url: &str) -> Result<PathBuf, AppError> {
        info!("Materializing image for recipe {recipe_id} from {url}");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::ImageDownload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::ImageDownload(format!(
                "image host returned {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::ImageDownload(e.to_string()))?;

        self.write(recipe_id, &bytes).await
    }

    /// Writes image bytes to the recipe's path, overwriting any previous file.
    pub async fn write(&self, recipe_id: &str, bytes: &[u8]) -> Result<PathBuf, AppError> {
        let path = self.image_path(recipe_id);

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::ImageDownload(e.to_string()))?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::ImageDownload(e.to_string()))?;

        Ok(path)
    }

    /// Best-effort delete of a materialized image. A missing file or a
    /// filesystem error is logged and swallowed; unsave never fails on it.
    pub async fn remove(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            warn!("Could not delete image {}: {e}", path.display());
        }
    }
}
