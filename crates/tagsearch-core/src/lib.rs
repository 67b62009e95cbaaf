//! tagsearch core - label search over machine-tagged images.
//!
//! A list of image URLs is classified in batches by an external
//! vision-tagging service. The per-image concepts are merged into an inverted
//! index from label to images, ranked by confidence, which then answers
//! search and label-listing queries.
//!
//! # Architecture
//!
//! ```text
//! image list → batches → Classifier → TagIndexBuilder → TagIndex → QueryService
//! ```
//!
//! Indexing runs to completion before any query is served. The finished
//! [`TagIndex`] is immutable and shared behind an `Arc`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tagsearch_core::{ClarifaiClassifier, Config, IndexOptions, Indexer, QueryService};
//!
//! #[tokio::main]
//! async fn main() -> tagsearch_core::Result<()> {
//!     let config = Config::load()?;
//!     let images = tagsearch_core::load_image_list(&config.images_file())?;
//!     let classifier = Arc::new(ClarifaiClassifier::from_config(&config.classifier)?);
//!     let indexer = Indexer::new(classifier, IndexOptions::from_config(&config));
//!     let report = indexer.build_index(&images).await?;
//!
//!     let queries = QueryService::new(Arc::new(report.index), config.server.search_limit);
//!     println!("{}", queries.search("dog"));
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod classify;
pub mod config;
pub mod error;
pub mod index;
pub mod output;
pub mod pipeline;
pub mod query;
pub mod types;

// Re-exports for convenient access
pub use classify::{ClarifaiClassifier, Classifier};
pub use config::{Config, FailurePolicy};
pub use error::{ClassifyError, ConfigError, IndexError, InputError, Result, TagSearchError};
pub use index::{TagIndex, TagIndexBuilder};
pub use output::{IndexWriter, OutputFormat};
pub use pipeline::{load_image_list, BatchEvent, BatchOutcome, IndexOptions, IndexReport, Indexer};
pub use query::QueryService;
pub use types::{Concept, ImageRef, IndexStats, LabelHit, PerImageLabels};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
