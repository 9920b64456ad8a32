//! The `alttext describe` command.

use super::types::{resolve_provider, ProviderArg};
use alttext_core::config::{expand_path, PublishConfig};
use alttext_core::{
    publish_alt_text, write_alt_text, AltText, AltTextPipeline, AltTextRecord, Config,
    LlmProviderFactory, PublishTarget, Publisher, S3Publisher,
};
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the `describe` command.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// URL of the image to describe
    #[arg(required = true)]
    pub url: String,

    /// LLM provider (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name (provider-specific)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Prompt sent alongside the image
    #[arg(long)]
    pub prompt: Option<String>,

    /// Also write the alt text to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Token limit for the response (provider default if unset)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_tokens: Option<u32>,

    /// Keep a copy of the downloaded image in this directory
    #[arg(long)]
    pub save_image: Option<PathBuf>,

    /// Upload the alt text to S3
    #[arg(long)]
    pub publish: bool,

    /// Print a JSON record instead of plain text
    #[arg(long)]
    pub json: bool,
}

/// Execute the describe command.
///
/// Only generation failures are fatal. A failed file write or upload is
/// logged and the alt text is still printed.
pub async fn execute(args: DescribeArgs, config: &Config) -> anyhow::Result<()> {
    let kind = resolve_provider(args.provider, config.llm.provider);
    let provider = LlmProviderFactory::create(kind, &config.llm, args.model.as_deref())?;

    let prompt = args.prompt.as_deref().unwrap_or(&config.prompt.text);
    if prompt.trim().is_empty() {
        anyhow::bail!("Prompt must not be empty");
    }

    let save_dir = args
        .save_image
        .as_deref()
        .map(expand_path)
        .or_else(|| config.save_dir());
    let pipeline = AltTextPipeline::new(provider, prompt)
        .with_save_dir(save_dir)
        .with_max_tokens(args.max_tokens);

    let alt_text = pipeline.generate(&args.url).await?;

    let output_path = args
        .output
        .as_deref()
        .map(expand_path)
        .or_else(|| config.output_path());
    let publisher = if args.publish || config.publish.enabled {
        s3_publisher(&config.publish).await
    } else {
        None
    };
    let delivered = deliver(
        &alt_text,
        output_path.as_deref(),
        publisher.as_ref().map(|p| p as &dyn Publisher),
    )
    .await;

    let rendered = if args.json {
        let record = AltTextRecord {
            url: args.url,
            alt_text,
            provider: pipeline.provider().name().to_string(),
            model: pipeline.provider().model().to_string(),
            output_path: delivered.output_path,
            published_key: delivered.published_key,
        };
        serde_json::to_string_pretty(&record)?
    } else {
        alt_text.into_string()
    };
    println!("{rendered}");

    Ok(())
}

/// Where the alt text ended up besides stdout.
#[derive(Debug, Default, PartialEq, Eq)]
struct Delivered {
    output_path: Option<PathBuf>,
    published_key: Option<String>,
}

/// Write and publish the alt text. Failures are logged and leave the
/// corresponding field empty.
async fn deliver(
    alt_text: &AltText,
    output_path: Option<&Path>,
    publisher: Option<&dyn Publisher>,
) -> Delivered {
    let mut delivered = Delivered::default();

    if let Some(path) = output_path {
        if write_alt_text(alt_text, path).await.is_ok() {
            delivered.output_path = Some(path.to_path_buf());
        }
    }

    if let Some(publisher) = publisher {
        match publish_alt_text(publisher, alt_text).await {
            Ok(published) => {
                tracing::info!("Alt text available at {}", published.location);
                delivered.published_key = Some(published.key);
            }
            Err(e) => tracing::error!("Failed to upload alt text: {e}"),
        }
    }

    delivered
}

/// Build an S3 publisher, or log why one can't be built.
async fn s3_publisher(config: &PublishConfig) -> Option<S3Publisher> {
    match PublishTarget::from_config(config) {
        Ok(target) => Some(S3Publisher::new(&target).await),
        Err(e) => {
            tracing::error!("{e}");
            None
        }
    }
}
