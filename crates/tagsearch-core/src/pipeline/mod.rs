//! Indexing pipeline components.
//!
//! - **loader**: Read the whitespace-separated image list
//! - **batch**: Positional partitioning into request-sized batches
//! - **indexer**: Drives the classifier over every batch and builds the index

pub mod batch;
pub mod indexer;
pub mod loader;

// Re-exports for convenient access
pub use batch::{batch_count, batches};
pub use indexer::{BatchEvent, BatchOutcome, IndexOptions, IndexReport, Indexer};
pub use loader::{load_image_list, parse_image_list};
