//! The `tagsearch serve` command: build the index, then answer queries.

use clap::Args;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tagsearch_core::{Config, QueryService};

use super::build::build_index;
use crate::server;

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Image list file (defaults to input.images_file from config)
    #[arg(short, long)]
    pub images: Option<PathBuf>,

    /// Address to listen on (defaults to server.bind from config)
    #[arg(short, long)]
    pub bind: Option<SocketAddr>,

    /// Directory of static web assets (defaults to server.static_dir from config)
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

/// Execute the serve command.
///
/// Indexing finishes before the listener is bound, so every request sees the
/// complete, frozen index.
pub async fn execute(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let addr = match args.bind {
        Some(addr) => addr,
        None => config.server.bind.parse()?,
    };
    let static_dir = args.static_dir.unwrap_or_else(|| config.static_dir());

    let report = build_index(&config, args.images.as_deref()).await?;
    let queries = QueryService::new(Arc::new(report.index), config.server.search_limit);

    let static_dir = if static_dir.is_dir() {
        Some(static_dir)
    } else {
        tracing::warn!(
            "Static asset directory {:?} not found, serving the query API only",
            static_dir
        );
        None
    };

    let app = server::router(queries, static_dir.as_deref());
    server::serve(addr, app).await
}
