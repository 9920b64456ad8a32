//! Ollama LLM provider for local vision model inference.
//!
//! Talks to an Ollama instance via its HTTP API. `/api/generate` streams one
//! JSON object per line, each carrying a piece of the answer in `response`,
//! with `done: true` on the last one.

use super::provider::{CompletionRequest, Fragment, FragmentStream, LlmProvider};
use super::stream::ndjson_stream;
use crate::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama provider for local vision model inference.
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    num_predict: Option<u32>,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            num_predict: None,
            client: reqwest::Client::new(),
        }
    }

    /// Default token limit when the request doesn't set one.
    pub fn with_num_predict(mut self, num_predict: Option<u32>) -> Self {
        self.num_predict = num_predict;
        self
    }
}

/// Ollama /api/generate request body.
#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    images: Vec<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Serialize)]
struct GenerateOptions {
    num_predict: u32,
}

/// One object of the /api/generate response stream.
#[derive(Deserialize)]
struct GenerateChunk {
    response: Option<String>,
    #[serde(default)]
    done: bool,
    error: Option<String>,
}

fn parse_chunk(line: &[u8]) -> PipelineResult<Fragment> {
    let chunk: GenerateChunk = serde_json::from_slice(line).map_err(|e| PipelineError::Decode {
        message: format!("Failed to parse Ollama response object: {e}"),
    })?;

    if let Some(error) = chunk.error {
        return Err(PipelineError::Schema {
            message: format!("Ollama reported an error: {error}"),
        });
    }

    let text = chunk.response.ok_or_else(|| PipelineError::Schema {
        message: "Ollama response object has no \"response\" field".to_string(),
    })?;

    Ok(Fragment::new(text, chunk.done))
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.endpoint);
        match self.client.get(&url).timeout(Duration::from_secs(5)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> PipelineResult<FragmentStream> {
        let url = format!("{}/api/generate", self.endpoint);

        let body = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            images: request.images.iter().map(|i| i.data.as_str()).collect(),
            options: request
                .max_tokens
                .or(self.num_predict)
                .map(|num_predict| GenerateOptions { num_predict }),
        };

        tracing::debug!("POST {url} (model \"{}\")", self.model);

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::transport(format!("Ollama request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(PipelineError::status("Ollama", status, text));
        }

        Ok(ndjson_stream(resp.bytes_stream(), parse_chunk).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chunk() {
        let fragment = parse_chunk(br#"{"model":"llava","response":"A ","done":false}"#).unwrap();
        assert_eq!(fragment, Fragment::new("A ", false));

        let last = parse_chunk(br#"{"response":"cat.","done":true}"#).unwrap();
        assert!(last.is_final);
    }

    #[test]
    fn test_parse_chunk_malformed_is_decode_error() {
        let err = parse_chunk(br#"{"response": "A "#).unwrap_err();
        assert!(matches!(err, PipelineError::Decode { .. }));
    }

    #[test]
    fn test_parse_chunk_missing_response_is_schema_error() {
        let err = parse_chunk(br#"{"done":true}"#).unwrap_err();
        assert!(matches!(err, PipelineError::Schema { .. }));
    }

    #[test]
    fn test_parse_chunk_error_object() {
        let err = parse_chunk(br#"{"error":"model 'llava' not found"}"#).unwrap_err();
        match err {
            PipelineError::Schema { message } => assert!(message.contains("not found")),
            other => panic!("Expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            model: "llava",
            prompt: "Briefly, what is in this image?",
            images: vec!["aGVsbG8="],
            options: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "model": "llava",
                "prompt": "Briefly, what is in this image?",
                "images": ["aGVsbG8="]
            })
        );
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llava");
        assert_eq!(provider.endpoint, "http://localhost:11434");
    }
}
