//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Prompt sent alongside every image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    /// Instruction text for the model
    pub text: String,
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            text: "Briefly, what is in this image?".to_string(),
        }
    }
}

/// Image acquisition settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Keep a copy of each downloaded image in this directory (supports `~`)
    pub save_dir: Option<PathBuf>,
}

/// Alt text file output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Write the generated alt text to this file (supports `~`)
    pub path: Option<PathBuf>,
}

/// Object storage publishing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Publish every generated alt text
    pub enabled: bool,

    /// Target bucket (supports ${ENV_VAR} syntax)
    pub bucket: String,

    /// Bucket region (supports ${ENV_VAR} syntax)
    pub region: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bucket: "${S3_BUCKET}".to_string(),
            region: "${AWS_REGION}".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Ollama `/api/generate` (streamed NDJSON)
    #[default]
    Ollama,
    /// OpenAI-compatible `/v1/chat/completions`
    OpenAi,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Ollama => write!(f, "ollama"),
            ProviderKind::OpenAi => write!(f, "openai"),
        }
    }
}

/// LLM provider configurations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider used when none is given on the command line
    pub provider: ProviderKind,

    /// Ollama configuration
    pub ollama: OllamaConfig,

    /// OpenAI-compatible configuration
    pub openai: OpenAiConfig,
}

/// Ollama configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaConfig {
    /// URL scheme, "http" or "https"
    pub protocol: String,

    /// Host name or address
    pub host: String,

    /// Port
    pub port: u16,

    /// Model name
    pub model: String,

    /// Token limit passed as `options.num_predict`
    pub num_predict: Option<u32>,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            protocol: "http".to_string(),
            host: "localhost".to_string(),
            port: 11434,
            model: "llava".to_string(),
            num_predict: None,
        }
    }
}

impl OllamaConfig {
    /// `protocol://host:port`
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }
}

/// OpenAI-compatible configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API host; `https://` is assumed unless a scheme is given
    pub origin: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,

    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            origin: "api.openai.com".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4-turbo".to_string(),
            max_tokens: 300,
        }
    }
}

impl OpenAiConfig {
    /// Full chat completions URL for the configured origin.
    pub fn completions_url(&self) -> String {
        let origin = self.origin.trim_end_matches('/');
        if origin.starts_with("http://") || origin.starts_with("https://") {
            format!("{origin}/v1/chat/completions")
        } else {
            format!("https://{origin}/v1/chat/completions")
        }
    }
}
