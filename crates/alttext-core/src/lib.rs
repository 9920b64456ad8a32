//! alttext core - alt text generation for remote images.
//!
//! Downloads an image, sends it to a multimodal LLM and returns a short
//! description suitable for an `alt` attribute. The result can be written to
//! a file and published to object storage.
//!
//! # Architecture
//!
//! ```text
//! URL → Acquire → Encode (base64) → Provider (Ollama | OpenAI) → Aggregate → AltText
//!                                                                   ├→ file
//!                                                                   └→ object storage
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use alttext_core::{AltTextPipeline, Config, LlmProviderFactory};
//!
//! #[tokio::main]
//! async fn main() -> alttext_core::Result<()> {
//!     let config = Config::load()?;
//!     let provider = LlmProviderFactory::create(config.llm.provider, &config.llm, None)?;
//!     let pipeline = AltTextPipeline::from_config(&config, provider);
//!
//!     let alt_text = pipeline.generate("https://example.com/cat.png").await?;
//!     println!("{alt_text}");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod image;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod publish;
pub mod types;

// Re-exports for convenient access
pub use config::{Config, ProviderKind};
pub use error::{
    AggregateError, AltTextError, ConfigError, PipelineError, PipelineResult, Result,
};
pub use image::{EncodedImage, ImageAcquirer, ImageBytes};
pub use llm::{CompletionRequest, Fragment, FragmentStream, LlmProvider, LlmProviderFactory};
pub use output::write_alt_text;
pub use pipeline::{AltTextPipeline, Stage};
pub use publish::{publish_alt_text, Published, PublishTarget, Publisher};
pub use types::{AltText, AltTextRecord};

#[cfg(feature = "s3")]
pub use publish::S3Publisher;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
