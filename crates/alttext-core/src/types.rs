//! Core data types for generated alt text.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Final, trimmed description of an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AltText(String);

impl AltText {
    /// Wrap generated text, trimming surrounding whitespace.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(text.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AltText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AltText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Summary of one run, for machine-readable output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AltTextRecord {
    /// Image URL that was described
    pub url: String,

    /// Generated alt text
    pub alt_text: AltText,

    /// Provider name (e.g., "ollama")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Where the alt text was written, if it was
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,

    /// Object key of the published copy, if published
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_key: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alt_text_trims() {
        let text = AltText::new("  A cat on a sofa.\n");
        assert_eq!(text.as_str(), "A cat on a sofa.");
        assert_eq!(text.to_string(), "A cat on a sofa.");
    }

    #[test]
    fn test_record_serialization_skips_missing() {
        let record = AltTextRecord {
            url: "https://example.com/cat.png".to_string(),
            alt_text: AltText::new("A cat."),
            provider: "ollama".to_string(),
            model: "llava".to_string(),
            output_path: None,
            published_key: Some("0b7c6f1e".to_string()),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["alt_text"], "A cat.");
        assert_eq!(json["published_key"], "0b7c6f1e");
        assert!(json.get("output_path").is_none());
    }
}
