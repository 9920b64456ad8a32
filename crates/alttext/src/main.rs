//! alttext CLI - describe remote images with a multimodal LLM.
//!
//! Downloads an image, asks a local Ollama model or an OpenAI-compatible
//! endpoint for a short description, and prints it to stdout. The result can
//! also be written to a file and published to S3.
//!
//! # Usage
//!
//! ```bash
//! # Describe an image with the configured provider
//! alttext describe https://example.com/cat.png
//!
//! # Use OpenAI and keep a copy of the text
//! alttext describe https://example.com/cat.png --provider openai --output cat.txt
//!
//! # Check that the provider is reachable
//! alttext check
//!
//! # View configuration
//! alttext config show
//! ```

use alttext_core::{Config, ConfigError};
use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// alttext - Generate alt text for remote images.
#[derive(Parser, Debug)]
#[command(name = "alttext")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true, conflicts_with = "silent")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    silent: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate alt text for an image URL
    Describe(cli::describe::DescribeArgs),

    /// Check that an LLM provider is reachable
    Check(cli::check::CheckArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // .env must be loaded before the config reads its environment overrides.
    let dotenv = dotenvy::dotenv();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = resolve_config(Config::load(), Config::from_env)?;
    logging::init_from_config(&config, cli.verbose, cli.silent, cli.json_logs);

    tracing::debug!("alttext v{}", alttext_core::VERSION);
    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => tracing::debug!("No .env file found"),
        Err(e) => tracing::warn!("Failed to read .env file: {e}"),
    }

    match cli.command {
        Commands::Describe(args) => cli::describe::execute(args, &config).await,
        Commands::Check(args) => cli::check::execute(args, &config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}

/// Pick the configuration to run with.
///
/// Invalid values, including bad environment overrides, are fatal. A config
/// file that can't be read or parsed falls back to `fallback`.
fn resolve_config(
    loaded: Result<Config, ConfigError>,
    fallback: impl FnOnce() -> Result<Config, ConfigError>,
) -> Result<Config, ConfigError> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e @ ConfigError::ValidationError(_)) => Err(e),
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `alttext config path`."
            );
            fallback()
        }
    }
}
