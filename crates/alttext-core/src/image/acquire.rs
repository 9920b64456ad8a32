//! Remote image download.

use super::ImageBytes;
use crate::error::{PipelineError, PipelineResult};
use std::path::{Path, PathBuf};

/// Downloads images over HTTP(S).
///
/// Performs exactly one GET per call. Transport failures and non-2xx
/// statuses are returned as errors without retrying.
#[derive(Debug, Clone, Default)]
pub struct ImageAcquirer {
    client: reqwest::Client,
}

impl ImageAcquirer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing HTTP client (shared connection pool, custom settings).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Download an image into memory.
    pub async fn acquire(&self, url: &str) -> PipelineResult<ImageBytes> {
        tracing::debug!("Downloading image from \"{url}\"");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::transport(format!("Image request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::status("Image download", status, text));
        }

        let data = resp
            .bytes()
            .await
            .map_err(|e| PipelineError::transport(format!("Failed to read image body: {e}")))?;

        let image = ImageBytes::new(data.to_vec());
        if image.is_empty() {
            tracing::warn!("Image at \"{url}\" has an empty body");
        }
        tracing::debug!(
            "Downloaded {} bytes, sniffed as {}",
            image.len(),
            image.mime
        );
        Ok(image)
    }

    /// Download an image and write it to `dir` under a fresh unique name.
    ///
    /// The directory is created if missing. Returns the path of the new file,
    /// named `<uuid>.<ext>` with the extension taken from the sniffed type.
    pub async fn acquire_to_dir(&self, url: &str, dir: &Path) -> PipelineResult<PathBuf> {
        let image = self.acquire(url).await?;

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| PipelineError::filesystem(dir, e))?;

        let path = dir.join(format!("{}.{}", uuid::Uuid::new_v4(), image.extension()));
        tokio::fs::write(&path, &image.data)
            .await
            .map_err(|e| PipelineError::filesystem(&path, e))?;

        tracing::info!("Saved image to {}", path.display());
        Ok(path)
    }
}
