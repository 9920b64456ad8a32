//! Alt-text pipeline orchestration.

use super::stage::Stage;
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::image::{EncodedImage, ImageAcquirer, ImageBytes};
use crate::llm::{aggregate, CompletionRequest, LlmProvider};
use crate::types::AltText;
use std::path::PathBuf;

/// Turns an image URL into alt text using one LLM provider.
///
/// Each call to [`generate`](Self::generate) runs acquire, encode, request and
/// aggregate in sequence. The first error ends the run and is returned
/// unchanged; nothing is retried.
pub struct AltTextPipeline {
    acquirer: ImageAcquirer,
    provider: Box<dyn LlmProvider>,
    prompt: String,
    max_tokens: Option<u32>,
    save_dir: Option<PathBuf>,
}

impl AltTextPipeline {
    pub fn new(provider: Box<dyn LlmProvider>, prompt: &str) -> Self {
        Self {
            acquirer: ImageAcquirer::new(),
            provider,
            prompt: prompt.to_string(),
            max_tokens: None,
            save_dir: None,
        }
    }

    /// Build a pipeline using the prompt and image settings from `config`.
    pub fn from_config(config: &Config, provider: Box<dyn LlmProvider>) -> Self {
        Self::new(provider, &config.prompt.text).with_save_dir(config.save_dir())
    }

    /// Keep a copy of each downloaded image in `dir`.
    pub fn with_save_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.save_dir = dir;
        self
    }

    /// Override the provider's default token limit.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn provider(&self) -> &dyn LlmProvider {
        self.provider.as_ref()
    }

    /// Generate alt text for the image at `url`.
    pub async fn generate(&self, url: &str) -> PipelineResult<AltText> {
        let mut stage = Stage::Idle;
        let result = self.run(url, &mut stage).await;

        match &result {
            Ok(alt_text) => {
                stage.advance(Stage::Done);
                if alt_text.is_empty() {
                    tracing::warn!("Model returned no text for \"{url}\"");
                }
            }
            Err(e) => {
                tracing::debug!("Alt text generation failed while {stage} \"{url}\": {e}");
                stage.advance(Stage::Failed);
            }
        }

        result
    }

    async fn run(&self, url: &str, stage: &mut Stage) -> PipelineResult<AltText> {
        stage.advance(Stage::Acquiring);
        let image = match &self.save_dir {
            Some(dir) => {
                let path = self.acquirer.acquire_to_dir(url, dir).await?;
                ImageBytes::read_from(&path).await?
            }
            None => self.acquirer.acquire(url).await?,
        };

        stage.advance(Stage::Encoding);
        let encoded = EncodedImage::encode(&image);
        drop(image);
        tracing::debug!("Base64 image data: {}...", encoded.preview());

        stage.advance(Stage::Requesting);
        let mut request = CompletionRequest::describe_image(encoded, &self.prompt);
        request.max_tokens = self.max_tokens;
        tracing::info!(
            "Running prompt with {} model \"{}\"",
            self.provider.name(),
            self.provider.model()
        );
        tracing::debug!("Prompt for image: \"{}\"", request.prompt);
        let fragments = self.provider.complete(&request).await?;

        stage.advance(Stage::Aggregating);
        let text = aggregate(fragments).await.map_err(|e| {
            if !e.partial.is_empty() {
                tracing::warn!("Discarding partial response: \"{}\"", e.partial);
            }
            PipelineError::from(e)
        })?;

        Ok(AltText::new(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{Fragment, FragmentStream};
    use async_trait::async_trait;
    use futures_util::{stream, StreamExt};
    use std::io::Write;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    /// Log sink shared between a test and its subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Provider that replays a fixed list of fragment results.
    struct ScriptedProvider {
        items: Vec<Result<Fragment, String>>,
        call_count: Arc<AtomicU32>,
    }

    impl ScriptedProvider {
        fn new(items: Vec<Result<Fragment, String>>) -> Self {
            Self {
                items,
                call_count: Arc::new(AtomicU32::new(0)),
            }
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted-v1"
        }

        async fn is_available(&self) -> bool {
            true
        }

        async fn complete(&self, request: &CompletionRequest) -> PipelineResult<FragmentStream> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            assert_eq!(request.images.len(), 1);
            let items: Vec<_> = self
                .items
                .iter()
                .cloned()
                .map(|item| item.map_err(|message| PipelineError::Decode { message }))
                .collect();
            Ok(stream::iter(items).boxed())
        }
    }

    #[test]
    fn test_from_config_uses_prompt() {
        let mut config = Config::default();
        config.prompt.text = "Describe for a screen reader.".to_string();
        let pipeline =
            AltTextPipeline::from_config(&config, Box::new(ScriptedProvider::new(vec![])));
        assert_eq!(pipeline.prompt, "Describe for a screen reader.");
        assert!(pipeline.save_dir.is_none());
        assert_eq!(pipeline.provider().name(), "scripted");
    }

    #[tokio::test]
    async fn test_unreachable_image_never_calls_provider() {
        let provider = ScriptedProvider::new(vec![Ok(Fragment::new("unused", true))]);
        let call_count = provider.call_count.clone();
        let pipeline = AltTextPipeline::new(Box::new(provider), "What is this?");

        // Port 9 (discard) on localhost is closed in test environments
        let err = pipeline
            .generate("http://127.0.0.1:9/cat.png")
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Transport { .. }));
        assert_eq!(call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_is_left_to_the_caller_to_report() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::ERROR)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let pipeline = AltTextPipeline::new(Box::new(ScriptedProvider::new(vec![])), "What?");
        assert!(pipeline.generate("http://127.0.0.1:9/cat.png").await.is_err());

        assert!(logs.0.lock().unwrap().is_empty());
    }
}
