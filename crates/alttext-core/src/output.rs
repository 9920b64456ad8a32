//! Writing generated alt text to disk.

use crate::error::{PipelineError, PipelineResult};
use crate::types::AltText;
use std::path::Path;

/// Write alt text to `path`, creating parent directories as needed.
///
/// An existing file is overwritten.
pub async fn write_alt_text(alt_text: &AltText, path: &Path) -> PipelineResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            tracing::error!("Failed to create directory {}: {e}", dir.display());
            PipelineError::filesystem(dir, e)
        })?;
    }

    tokio::fs::write(path, alt_text.as_str()).await.map_err(|e| {
        tracing::error!("Failed to write alt text to {}: {e}", path.display());
        PipelineError::filesystem(path, e)
    })?;

    tracing::info!("Alt text written to {}", path.display());
    Ok(())
}
