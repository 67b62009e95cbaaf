//! tagsearch CLI - tag images through a vision service and search them by label.
//!
//! The image list is classified once at startup; the resulting label index is
//! then served over HTTP or exported as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Build the index and serve search on :3000
//! tagsearch serve --images files/images.txt
//!
//! # Build the index and export it
//! tagsearch index --images files/images.txt --output index.jsonl --format jsonl
//!
//! # View configuration
//! tagsearch config show
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod logging;
mod server;

/// tagsearch - search images by machine-generated labels.
#[derive(Parser, Debug)]
#[command(name = "tagsearch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "TAGSEARCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Tag the image list, then serve search and label listing over HTTP
    Serve(cli::serve::ServeArgs),

    /// Tag the image list and export the resulting index
    Index(cli::index::IndexArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match &cli.config {
        Some(path) => tagsearch_core::Config::load_from(path)?,
        None => match tagsearch_core::Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `tagsearch config path`."
                );
                tagsearch_core::Config::default()
            }
        },
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("tagsearch v{}", tagsearch_core::VERSION);

    match cli.command {
        Commands::Serve(args) => cli::serve::execute(args, config).await,
        Commands::Index(args) => cli::index::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args, cli.config).await,
    }
}
