//! Configuration validation.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are usable.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.prompt.text.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "prompt.text must not be empty".into(),
            ));
        }
        let ollama = &self.llm.ollama;
        if ollama.protocol != "http" && ollama.protocol != "https" {
            return Err(ConfigError::ValidationError(format!(
                "llm.ollama.protocol must be \"http\" or \"https\", got \"{}\"",
                ollama.protocol
            )));
        }
        if ollama.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.ollama.host must not be empty".into(),
            ));
        }
        if ollama.port == 0 {
            return Err(ConfigError::ValidationError(
                "llm.ollama.port must be > 0".into(),
            ));
        }
        if self.llm.openai.origin.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "llm.openai.origin must not be empty".into(),
            ));
        }
        if self.llm.openai.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "llm.openai.max_tokens must be > 0".into(),
            ));
        }
        if self.logging.format != "pretty" && self.logging.format != "json" {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}
