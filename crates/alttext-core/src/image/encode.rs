//! Base64 encoding of image bytes for LLM request bodies.

use super::sniff;
use super::ImageBytes;
use base64::Engine;

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// Standard base64 of the image bytes
    pub data: String,
    /// MIME type used for `data:` URLs
    pub media_type: String,
}

impl EncodedImage {
    /// Encode raw image bytes.
    ///
    /// The sniffed MIME type is carried through to the data URL. Payloads that
    /// did not sniff as an image are labelled `image/jpeg`.
    pub fn encode(image: &ImageBytes) -> Self {
        let media_type = if sniff::is_image(&image.mime) {
            image.mime.clone()
        } else {
            tracing::warn!(
                "Content sniffed as '{}', labelling it image/jpeg",
                image.mime
            );
            "image/jpeg".to_string()
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(&image.data),
            media_type,
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }

    /// Leading characters of the encoded data, for log lines.
    pub fn preview(&self) -> &str {
        let end = self.data.len().min(50);
        &self.data[..end]
    }
}
