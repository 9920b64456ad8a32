//! Configuration management for alttext.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults, then overridden by environment variables. The resulting value is
//! built once at startup and handed to each client and pipeline by reference.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for alttext.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prompt settings
    pub prompt: PromptConfig,

    /// Image acquisition settings
    pub image: ImageConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Alt text file output
    pub output: OutputConfig,

    /// Object storage publishing
    pub publish: PublishConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location, then apply environment overrides.
    ///
    /// Falls back to defaults if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Self::finish(Self::default())
        }
    }

    /// Load configuration from a specific file path, then apply environment overrides.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Self::finish(config)
    }

    /// Defaults with environment overrides applied, ignoring any config file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom environment lookup.
    pub fn from_env_with<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::finish_with(Self::default(), lookup)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        Self::finish_with(config, |key| std::env::var(key).ok())
    }

    fn finish_with<F>(mut config: Config, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        config.apply_env(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from environment variables.
    ///
    /// `lookup` returns the value of a variable, or `None` when unset.
    /// Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(protocol) = get("OLLAMA_PROTOCOL") {
            self.llm.ollama.protocol = protocol;
        }
        if let Some(host) = get("OLLAMA_HOST") {
            self.llm.ollama.host = host;
        }
        if let Some(port) = get("OLLAMA_PORT") {
            self.llm.ollama.port = port.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("OLLAMA_PORT is not a valid port: {port}"))
            })?;
        }
        if let Some(model) = get("OLLAMA_MODEL") {
            self.llm.ollama.model = model;
        }
        if let Some(origin) = get("OPENAI_ORIGIN") {
            self.llm.openai.origin = origin;
        }
        if let Some(model) = get("OPENAI_MODEL") {
            self.llm.openai.model = model;
        }
        if let Some(text) = get("PROMPT_TEXT") {
            self.prompt.text = text;
        }
        if let Some(bucket) = get("S3_BUCKET") {
            self.publish.bucket = bucket;
        }
        if let Some(region) = get("AWS_REGION") {
            self.publish.region = region;
        }
        Ok(())
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.alttext.alttext/config.toml
    /// - Linux: ~/.config/alttext/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\alttext\config\config.toml
    ///
    /// Falls back to ~/.alttext/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "alttext", "alttext")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".alttext").join("config.toml")
            })
    }

    /// Resolved image save directory (with ~ expansion).
    pub fn save_dir(&self) -> Option<PathBuf> {
        self.image.save_dir.as_deref().map(expand_path)
    }

    /// Resolved alt text output path (with ~ expansion).
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.path.as_deref().map(expand_path)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    resolve_env_var_with(value, |key| std::env::var(key).ok())
}

/// Resolve `${ENV_VAR}` references using a custom variable lookup.
///
/// Plain strings pass through; empty strings and unset variables yield `None`.
pub fn resolve_env_var_with<F>(value: &str, lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        lookup(var_name).filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Expand a leading `~` in a path.
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.provider, ProviderKind::Ollama);
        assert_eq!(config.llm.ollama.origin(), "http://localhost:11434");
        assert_eq!(config.llm.ollama.model, "llava");
        assert_eq!(config.llm.openai.model, "gpt-4-turbo");
        assert_eq!(config.llm.openai.max_tokens, 300);
        assert_eq!(config.prompt.text, "Briefly, what is in this image?");
        assert!(!config.publish.enabled);
    }

    #[test]
    fn test_from_env_keeps_overrides() {
        let config =
            Config::from_env_with(env(&[("OLLAMA_HOST", "gpu-box"), ("OLLAMA_MODEL", "bakllava")]))
                .unwrap();
        assert_eq!(config.llm.ollama.origin(), "http://gpu-box:11434");
        assert_eq!(config.llm.ollama.model, "bakllava");
    }

    #[test]
    fn test_from_env_rejects_bad_port() {
        let err = Config::from_env_with(env(&[("OLLAMA_HOST", "gpu-box"), ("OLLAMA_PORT", "abc")]))
            .unwrap_err();
        match err {
            ConfigError::ValidationError(message) => assert!(message.contains("OLLAMA_PORT")),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[prompt]"));
        assert!(toml.contains("[llm.ollama]"));
        assert!(toml.contains("provider = \"ollama\""));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [llm]
            provider = "openai"

            [llm.ollama]
            host = "gpu-box"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.provider, ProviderKind::OpenAi);
        assert_eq!(config.llm.ollama.origin(), "http://gpu-box:11434");
        assert_eq!(config.llm.ollama.model, "llava");
    }

    #[test]
    fn test_apply_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(env(&[
                ("OLLAMA_PROTOCOL", "https"),
                ("OLLAMA_HOST", "ollama.internal"),
                ("OLLAMA_PORT", "8443"),
                ("PROMPT_TEXT", "Describe the image for a screen reader."),
                ("S3_BUCKET", "alt-texts"),
            ]))
            .unwrap();
        assert_eq!(config.llm.ollama.origin(), "https://ollama.internal:8443");
        assert_eq!(config.prompt.text, "Describe the image for a screen reader.");
        assert_eq!(config.publish.bucket, "alt-texts");
        // Untouched values keep their defaults
        assert_eq!(config.publish.region, "${AWS_REGION}");
    }

    #[test]
    fn test_apply_env_ignores_empty_values() {
        let mut config = Config::default();
        config.apply_env(env(&[("OLLAMA_HOST", "  ")])).unwrap();
        assert_eq!(config.llm.ollama.host, "localhost");
    }

    #[test]
    fn test_apply_env_rejects_bad_port() {
        let mut config = Config::default();
        let err = config.apply_env(env(&[("OLLAMA_PORT", "eleven")])).unwrap_err();
        assert!(err.to_string().contains("OLLAMA_PORT"));
    }

    #[test]
    fn test_completions_url() {
        let mut cfg = OpenAiConfig::default();
        assert_eq!(
            cfg.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
        cfg.origin = "http://127.0.0.1:8080/".to_string();
        assert_eq!(
            cfg.completions_url(),
            "http://127.0.0.1:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_resolve_env_var() {
        // Non-env-var strings pass through
        assert_eq!(resolve_env_var("plain-key"), Some("plain-key".to_string()));
        // Empty returns None
        assert_eq!(resolve_env_var(""), None);
        // Unset env var returns None
        assert_eq!(resolve_env_var("${DEFINITELY_NOT_SET_XYZ_123}"), None);
    }

    #[test]
    fn test_resolve_env_var_with_lookup() {
        let lookup = env(&[("S3_BUCKET", "alt-texts"), ("EMPTY", "")]);
        assert_eq!(
            resolve_env_var_with("${S3_BUCKET}", &lookup),
            Some("alt-texts".to_string())
        );
        assert_eq!(resolve_env_var_with("${EMPTY}", &lookup), None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[prompt]\ntext = \"What is shown?\"\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert!(!config.prompt.text.is_empty());
    }
}
