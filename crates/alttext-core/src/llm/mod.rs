//! LLM integration for image description generation.
//!
//! Provides a provider abstraction over the supported backends (Ollama and
//! OpenAI-compatible), incremental decoding of streamed responses, and the
//! aggregation of response fragments into one string.

pub(crate) mod aggregate;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;
pub(crate) mod stream;

pub use aggregate::aggregate;
pub use provider::{CompletionRequest, Fragment, FragmentStream, LlmProvider, LlmProviderFactory};
