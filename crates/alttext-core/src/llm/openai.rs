//! OpenAI-compatible LLM provider using the Chat Completions API.
//!
//! Sends the image as a data URL in the user message content array and reads
//! a single JSON response object.

use super::provider::{CompletionRequest, Fragment, FragmentStream, LlmProvider};
use crate::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use futures_util::{stream, StreamExt};
use serde::Serialize;
use serde_json::Value;

/// OpenAI-compatible provider using Chat Completions API.
pub struct OpenAiProvider {
    api_key: String,
    model: String,
    max_tokens: u32,
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiProvider {
    /// `endpoint` is the full chat completions URL.
    pub fn new(endpoint: &str, api_key: &str, model: &str, max_tokens: u32) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
            client: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

impl OpenAiProvider {
    fn build_request(&self, request: &CompletionRequest) -> ChatRequest {
        let mut content = vec![ChatContent::Text {
            text: request.prompt.clone(),
        }];
        content.extend(request.images.iter().map(|image| ChatContent::ImageUrl {
            image_url: ImageUrl {
                url: image.data_url(),
            },
        }));

        ChatRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens.unwrap_or(self.max_tokens),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content,
            }],
        }
    }
}

/// Pull `choices[0].message.content` out of a response body.
///
/// Only a body that isn't JSON is a decode error. Missing or mistyped fields
/// along the path are schema errors.
fn extract_content(body: &str) -> PipelineResult<String> {
    let chat_resp: Value = serde_json::from_str(body).map_err(|e| PipelineError::Decode {
        message: format!("Failed to parse OpenAI response: {e}"),
    })?;

    if let Some(total_tokens) = chat_resp.pointer("/usage/total_tokens").and_then(Value::as_u64) {
        tracing::debug!(
            "OpenAI used {total_tokens} tokens (model {})",
            chat_resp["model"].as_str().unwrap_or("unknown")
        );
    }

    let choice = chat_resp["choices"]
        .as_array()
        .and_then(|choices| choices.first())
        .ok_or_else(|| PipelineError::Schema {
            message: "no choices found in response".to_string(),
        })?;

    let message = choice
        .get("message")
        .filter(|message| message.is_object())
        .ok_or_else(|| PipelineError::Schema {
            message: "no message found in first choice".to_string(),
        })?;

    message["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PipelineError::Schema {
            message: "no content found in message".to_string(),
        })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn complete(&self, request: &CompletionRequest) -> PipelineResult<FragmentStream> {
        let body = self.build_request(request);

        tracing::debug!("POST {} (model \"{}\")", self.endpoint, self.model);

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::transport(format!("OpenAI request failed: {e}")))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| PipelineError::transport(format!("Failed to read OpenAI response: {e}")))?;

        if !status.is_success() {
            return Err(PipelineError::status("OpenAI", status, text));
        }

        let content = extract_content(&text)?;
        let fragment = Ok::<_, PipelineError>(Fragment::new(content, true));
        Ok(stream::iter(vec![fragment]).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{EncodedImage, ImageBytes};

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_extract_content() {
        let body = r#"{"choices":[{"message":{"content":" A cat. "}}],"model":"gpt-4-turbo"}"#;
        assert_eq!(extract_content(body).unwrap(), " A cat. ");
    }

    #[test]
    fn test_extract_content_missing_choices() {
        let err = extract_content(r#"{"id":"chatcmpl-1"}"#).unwrap_err();
        match err {
            PipelineError::Schema { message } => assert!(message.contains("no choices")),
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_content_empty_choices() {
        let err = extract_content(r#"{"choices":[]}"#).unwrap_err();
        assert!(matches!(err, PipelineError::Schema { .. }));
    }

    #[test]
    fn test_extract_content_missing_message() {
        let err = extract_content(r#"{"choices":[{"index":0}]}"#).unwrap_err();
        match err {
            PipelineError::Schema { message } => assert!(message.contains("no message")),
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_content_null_content() {
        let err = extract_content(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap_err();
        match err {
            PipelineError::Schema { message } => assert!(message.contains("no content")),
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_content_usage_without_total() {
        let body = r#"{"choices":[{"message":{"content":"A cat."}}],"usage":{"prompt_tokens":12,"completion_tokens":3}}"#;
        assert_eq!(extract_content(body).unwrap(), "A cat.");
    }

    #[test]
    fn test_extract_content_mistyped_fields_are_schema_errors() {
        for (body, expected) in [
            (r#"{"choices":{}}"#, "no choices"),
            (r#"{"choices":"none"}"#, "no choices"),
            (r#"[1, 2]"#, "no choices"),
            (r#"{"choices":[{"message":"A cat."}]}"#, "no message"),
            (r#"{"choices":[{"message":{"content":42}}]}"#, "no content"),
        ] {
            match extract_content(body).unwrap_err() {
                PipelineError::Schema { message } => assert!(message.contains(expected), "{body}"),
                other => panic!("Expected schema error for {body}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_extract_content_malformed_is_decode_error() {
        let err = extract_content("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_request_body_shape() {
        let provider = OpenAiProvider::new(
            "https://api.openai.com/v1/chat/completions",
            "sk-test",
            "gpt-4-turbo",
            300,
        );
        let image = EncodedImage::encode(&ImageBytes::new(PNG.to_vec()));
        let request = CompletionRequest::describe_image(image, "What is this?");
        let json = serde_json::to_value(provider.build_request(&request)).unwrap();

        assert_eq!(json["model"], "gpt-4-turbo");
        assert_eq!(json["max_tokens"], 300);
        assert_eq!(json["messages"][0]["role"], "user");
        let content = &json["messages"][0]["content"];
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "What is this?");
        assert_eq!(content[1]["type"], "image_url");
        assert!(content[1]["image_url"]["url"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_request_max_tokens_override() {
        let provider = OpenAiProvider::new("http://localhost/v1/chat/completions", "k", "m", 300);
        let image = EncodedImage::encode(&ImageBytes::new(PNG.to_vec()));
        let mut request = CompletionRequest::describe_image(image, "What is this?");
        request.max_tokens = Some(50);
        assert_eq!(provider.build_request(&request).max_tokens, 50);
    }

    #[tokio::test]
    async fn test_available_only_with_key() {
        let url = "http://localhost/v1/chat/completions";
        assert!(OpenAiProvider::new(url, "sk-test", "m", 300).is_available().await);
        assert!(!OpenAiProvider::new(url, "", "m", 300).is_available().await);
    }
}
