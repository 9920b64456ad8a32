//! LLM provider trait and request/response types.
//!
//! Defines the interface that all LLM providers implement, plus the
//! factory that creates the right provider from CLI flags and config.

use crate::config::{resolve_env_var, LlmConfig, ProviderKind};
use crate::error::{PipelineError, PipelineResult};
use crate::image::EncodedImage;
use async_trait::async_trait;
use futures_util::stream::BoxStream;

/// A request to describe one or more images.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Images to describe
    pub images: Vec<EncodedImage>,
    /// Text prompt for the model
    pub prompt: String,
    /// Token limit; `None` uses the provider's configured default
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    /// Build a description request for a single image.
    pub fn describe_image(image: EncodedImage, prompt: &str) -> Self {
        Self {
            images: vec![image],
            prompt: prompt.to_string(),
            max_tokens: None,
        }
    }
}

/// One piece of generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Text payload
    pub text: String,
    /// Set on the last fragment the provider sends. Informational only.
    pub is_final: bool,
}

impl Fragment {
    pub fn new(text: impl Into<String>, is_final: bool) -> Self {
        Self {
            text: text.into(),
            is_final,
        }
    }
}

/// Lazily decoded response fragments, in arrival order.
///
/// Ends at end-of-stream. A decode failure is yielded as the last item.
pub type FragmentStream = BoxStream<'static, PipelineResult<Fragment>>;

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "ollama", "openai").
    fn name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model(&self) -> &str;

    /// Check whether the provider is configured and reachable.
    async fn is_available(&self) -> bool;

    /// Send a completion request and return its response fragments.
    ///
    /// Errors before the body is read (transport failures, non-2xx statuses)
    /// are returned directly. Errors while decoding the body arrive through
    /// the stream after any fragments already decoded.
    async fn complete(&self, request: &CompletionRequest) -> PipelineResult<FragmentStream>;
}

/// Factory that creates the appropriate provider from CLI flags and config.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an LLM provider.
    ///
    /// # Arguments
    /// * `kind` - Which backend to talk to
    /// * `config` - The full LLM config section
    /// * `model_override` - Optional model name that overrides the config default
    pub fn create(
        kind: ProviderKind,
        config: &LlmConfig,
        model_override: Option<&str>,
    ) -> PipelineResult<Box<dyn LlmProvider>> {
        match kind {
            ProviderKind::Ollama => {
                let cfg = &config.ollama;
                let model = model_override.unwrap_or(&cfg.model);
                Ok(Box::new(
                    super::ollama::OllamaProvider::new(&cfg.origin(), model)
                        .with_num_predict(cfg.num_predict),
                ))
            }
            ProviderKind::OpenAi => {
                let cfg = &config.openai;
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    PipelineError::Configuration(
                        "OpenAI API key not set. Set OPENAI_API_KEY env var.".to_string(),
                    )
                })?;
                let model = model_override.unwrap_or(&cfg.model);
                Ok(Box::new(super::openai::OpenAiProvider::new(
                    &cfg.completions_url(),
                    &api_key,
                    model,
                    cfg.max_tokens,
                )))
            }
        }
    }
}
