//! Classifier trait.

use async_trait::async_trait;

use crate::error::ClassifyError;
use crate::types::{ImageRef, PerImageLabels};

/// Trait that all classification backends implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (the pipeline holds an `Arc<dyn Classifier>`).
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Backend name for logging (e.g., "clarifai").
    fn name(&self) -> &str;

    /// Most images a single `classify` call accepts.
    fn max_batch_size(&self) -> usize;

    /// Classify one batch of images.
    ///
    /// Results are keyed by the reference the service echoes back, not by
    /// position, and may cover only part of the batch. They may come back in
    /// any order; the indexer merges them in batch order. An error means no
    /// image in the batch was classified.
    async fn classify(&self, batch: &[ImageRef]) -> Result<Vec<PerImageLabels>, ClassifyError>;
}
