//! Image acquisition and encoding.
//!
//! - **acquire**: Download a remote image, optionally keeping a copy on disk
//! - **sniff**: Infer MIME type and file extension from leading bytes
//! - **encode**: Base64 and `data:` URL encoding for request bodies

pub mod acquire;
pub mod encode;
pub mod sniff;

pub use acquire::ImageAcquirer;
pub use encode::EncodedImage;

use crate::error::{PipelineError, PipelineResult};
use std::path::Path;

/// Raw image payload with its sniffed MIME type.
#[derive(Debug, Clone)]
pub struct ImageBytes {
    /// Raw bytes as received
    pub data: Vec<u8>,
    /// MIME type sniffed from the leading bytes
    pub mime: String,
}

impl ImageBytes {
    /// Wrap raw bytes, sniffing their MIME type.
    pub fn new(data: Vec<u8>) -> Self {
        let mime = sniff::sniff_mime(&data).to_string();
        Self { data, mime }
    }

    /// Read an image previously written to disk.
    pub async fn read_from(path: &Path) -> PipelineResult<Self> {
        let data = tokio::fs::read(path)
            .await
            .map_err(|e| PipelineError::filesystem(path, e))?;
        Ok(Self::new(data))
    }

    /// File extension matching the sniffed type.
    pub fn extension(&self) -> &'static str {
        sniff::extension_for(&self.mime)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_bytes_sniffs_on_construction() {
        let image = ImageBytes::new(vec![0xFF, 0xD8, 0xFF, 0xDB]);
        assert_eq!(image.mime, "image/jpeg");
        assert_eq!(image.extension(), "jpg");
        assert_eq!(image.len(), 4);
    }

    #[tokio::test]
    async fn test_read_from_missing_file() {
        let err = ImageBytes::read_from(Path::new("/nonexistent/dir/img.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Filesystem { .. }));
    }
}
