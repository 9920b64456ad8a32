//! Value enums shared by several commands.

use alttext_core::ProviderKind;
use clap::ValueEnum;

/// Supported LLM providers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// Local Ollama instance
    Ollama,
    /// OpenAI or a compatible chat completions endpoint
    Openai,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Ollama => ProviderKind::Ollama,
            ProviderArg::Openai => ProviderKind::OpenAi,
        }
    }
}

/// The provider named on the command line, else the configured one.
pub fn resolve_provider(arg: Option<ProviderArg>, configured: ProviderKind) -> ProviderKind {
    arg.map(ProviderKind::from).unwrap_or(configured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_overrides_configured_provider() {
        assert_eq!(
            resolve_provider(Some(ProviderArg::Openai), ProviderKind::Ollama),
            ProviderKind::OpenAi
        );
        assert_eq!(
            resolve_provider(None, ProviderKind::OpenAi),
            ProviderKind::OpenAi
        );
    }
}
