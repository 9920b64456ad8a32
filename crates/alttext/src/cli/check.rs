//! The `alttext check` command.

use super::types::{resolve_provider, ProviderArg};
use alttext_core::{Config, LlmProviderFactory};
use clap::Args;

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Provider to check (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model name to report (provider-specific)
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Execute the check command.
pub async fn execute(args: CheckArgs, config: &Config) -> anyhow::Result<()> {
    let kind = resolve_provider(args.provider, config.llm.provider);
    let provider = LlmProviderFactory::create(kind, &config.llm, args.model.as_deref())?;

    if !provider.is_available().await {
        anyhow::bail!(
            "{} is not available. Check the [llm.{kind}] section of your config.",
            provider.name()
        );
    }

    println!("{} is available (model: {})", provider.name(), provider.model());
    Ok(())
}
