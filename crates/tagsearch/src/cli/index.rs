//! The `tagsearch index` command: build the index and export it.

use clap::{Args, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tagsearch_core::{Config, IndexWriter, OutputFormat as CoreOutputFormat, TagIndex};

use super::build::build_index;

/// Supported export formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExportFormat {
    /// One JSON object mapping labels to ranked hits
    Json,
    /// One {"label", "hits"} record per line
    Jsonl,
}

impl From<ExportFormat> for CoreOutputFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => CoreOutputFormat::Json,
            ExportFormat::Jsonl => CoreOutputFormat::JsonLines,
        }
    }
}

/// Arguments for the `index` command.
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Image list file (defaults to input.images_file from config)
    #[arg(short, long)]
    pub images: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ExportFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the index command.
pub async fn execute(args: IndexArgs, config: Config) -> anyhow::Result<()> {
    let report = build_index(&config, args.images.as_deref()).await?;
    write_export(&report.index, &args)
}

fn write_export(index: &TagIndex, args: &IndexArgs) -> anyhow::Result<()> {
    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    let mut writer = IndexWriter::new(writer, args.format.into(), args.pretty);
    let labels = writer.write_index(index)?;
    writer.flush()?;

    if let Some(path) = &args.output {
        tracing::info!("Wrote {labels} labels to {:?}", path);
    }
    Ok(())
}
