//! Logging initialization.
//!
//! Logs go to stderr so stdout only ever carries alt text.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(true),
            )
            .init();
    }
}

/// Initialize logging from config, with CLI flags taking precedence.
pub fn init_from_config(
    config: &alttext_core::Config,
    verbose: bool,
    silent: bool,
    json_logs: bool,
) {
    let level = level_for(&config.logging.level, verbose, silent);
    let json_format = json_logs || config.logging.format == "json";
    init(level, json_format);
}

fn level_for(configured: &str, verbose: bool, silent: bool) -> &str {
    if verbose {
        "debug"
    } else if silent {
        "warn"
    } else {
        configured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config_level() {
        assert_eq!(level_for("info", true, false), "debug");
        assert_eq!(level_for("debug", false, true), "warn");
        assert_eq!(level_for("trace", false, false), "trace");
    }
}
