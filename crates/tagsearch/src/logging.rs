//! Logging initialization.
//!
//! Uses the `tracing` ecosystem with human-readable or JSON output on stderr.

use tagsearch_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter directive for the configured level; `--verbose` raises it to at least debug.
fn level_directive(configured: &str, verbose: bool) -> &str {
    match (verbose, configured) {
        (true, "trace") => "trace",
        (true, _) => "debug",
        (false, level) => level,
    }
}

/// Initialize logging from the `[logging]` config section, with CLI overrides.
///
/// `RUST_LOG` wins over both. Output goes to stderr so that exported index
/// data on stdout stays clean.
pub fn init_from_config(config: &Config, verbose: bool, json_logs: bool) {
    let directive = level_directive(&config.logging.level, verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let json_format = json_logs || config.logging.format == "json";

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
