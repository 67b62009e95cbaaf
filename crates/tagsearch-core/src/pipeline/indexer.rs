//! Index construction: classify every batch, merge results, sort once.
//!
//! Batches are merged strictly in input order, whether they were classified
//! one at a time or with several requests in flight. Insertion order, and so
//! tie order in the finished index, therefore always follows the image list.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

use super::batch::{batch_count, batches};
use crate::classify::{order_by_batch, Classifier};
use crate::config::{Config, FailurePolicy};
use crate::error::{ClassifyError, IndexError};
use crate::index::{TagIndex, TagIndexBuilder};
use crate::types::{ImageRef, IndexStats, PerImageLabels};

/// Settings for one indexing run.
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Requested images per batch, clamped to the classifier's limit
    pub batch_size: usize,
    /// Batches classified concurrently
    pub parallel: usize,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
    /// Skip or stop on a failed batch
    pub failure_policy: FailurePolicy,
    /// Optional per-label hit cap applied after sorting
    pub max_hits_per_label: Option<usize>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            batch_size: crate::config::CLARIFAI_MAX_INPUTS,
            parallel: 1,
            timeout_ms: 30_000,
            failure_policy: FailurePolicy::Continue,
            max_hits_per_label: None,
        }
    }
}

impl IndexOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            batch_size: config.classifier.max_batch_size,
            parallel: config.indexing.parallel_batches,
            timeout_ms: config.classifier.timeout_ms,
            failure_policy: config.indexing.failure_policy,
            max_hits_per_label: config.indexing.max_hits_per_label,
        }
    }
}

/// The finished index plus run statistics.
#[derive(Debug)]
pub struct IndexReport {
    pub index: TagIndex,
    pub stats: IndexStats,
}

/// What happened to one batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    /// The batch was merged
    Indexed { images: usize, hits: usize },
    /// Classification failed; the batch's images are not indexed
    Failed(String),
}

/// Progress notification emitted after each batch is merged or skipped.
#[derive(Debug, Clone)]
pub struct BatchEvent {
    /// 1-based batch number
    pub batch: usize,
    pub total: usize,
    /// Images submitted in this batch
    pub size: usize,
    pub outcome: BatchOutcome,
}

/// Drives a [`Classifier`] over an image list and builds a [`TagIndex`].
pub struct Indexer {
    classifier: Arc<dyn Classifier>,
    options: IndexOptions,
}

impl Indexer {
    pub fn new(classifier: Arc<dyn Classifier>, options: IndexOptions) -> Self {
        Self {
            classifier,
            options,
        }
    }

    /// Effective images per request.
    pub fn batch_size(&self) -> usize {
        self.options
            .batch_size
            .min(self.classifier.max_batch_size())
            .max(1)
    }

    /// Build the index for `images`.
    pub async fn build_index(&self, images: &[ImageRef]) -> Result<IndexReport, IndexError> {
        self.build_index_with_progress(images, |_| {}).await
    }

    /// Build the index, calling `on_batch` after each batch is handled.
    ///
    /// Under [`FailurePolicy::Continue`] a failed batch is logged, reported
    /// through `on_batch`, and left out of the index. Under
    /// [`FailurePolicy::Abort`] the first failure is returned as an error.
    pub async fn build_index_with_progress<F>(
        &self,
        images: &[ImageRef],
        on_batch: F,
    ) -> Result<IndexReport, IndexError>
    where
        F: FnMut(&BatchEvent) + Send,
    {
        let start = Instant::now();
        let batch_size = self.batch_size();
        let total = batch_count(images.len(), batch_size);

        if images.is_empty() {
            tracing::warn!("No images to index");
        }
        tracing::info!(
            "Indexing {} images in {} batches of up to {} via {}",
            images.len(),
            total,
            batch_size,
            self.classifier.name()
        );

        let mut merger = Merger {
            builder: TagIndexBuilder::new(),
            stats: IndexStats {
                batches_total: total,
                images_submitted: images.len(),
                ..IndexStats::default()
            },
            total,
            policy: self.options.failure_policy,
            on_batch,
        };

        if self.options.parallel <= 1 {
            self.run_sequential(images, batch_size, &mut merger).await?;
        } else {
            self.run_concurrent(images, batch_size, &mut merger).await?;
        }

        let Merger {
            builder, mut stats, ..
        } = merger;
        let index = builder.finish(self.options.max_hits_per_label);

        stats.labels = index.label_count();
        stats.hits = index.hit_count();
        stats.total_seconds = start.elapsed().as_secs_f64();

        tracing::info!(
            "Indexed {} of {} images under {} labels ({} failed batches) in {:.1}s",
            stats.images_indexed,
            stats.images_submitted,
            stats.labels,
            stats.batches_failed,
            stats.total_seconds
        );

        Ok(IndexReport { index, stats })
    }

    async fn run_sequential<F>(
        &self,
        images: &[ImageRef],
        batch_size: usize,
        merger: &mut Merger<F>,
    ) -> Result<(), IndexError>
    where
        F: FnMut(&BatchEvent),
    {
        for (i, batch) in batches(images, batch_size).enumerate() {
            tracing::info!("Classification call {} of {}", i + 1, merger.total);
            let result =
                classify_with_timeout(self.classifier.as_ref(), batch, self.options.timeout_ms)
                    .await;
            merger.apply(i + 1, batch.len(), result)?;
        }
        Ok(())
    }

    async fn run_concurrent<F>(
        &self,
        images: &[ImageRef],
        batch_size: usize,
        merger: &mut Merger<F>,
    ) -> Result<(), IndexError>
    where
        F: FnMut(&BatchEvent),
    {
        let semaphore = Arc::new(Semaphore::new(self.options.parallel));
        let mut handles = Vec::with_capacity(merger.total);

        for batch in batches(images, batch_size) {
            let semaphore = semaphore.clone();
            let classifier = self.classifier.clone();
            let timeout_ms = self.options.timeout_ms;
            let batch = batch.to_vec();

            handles.push(tokio::spawn(async move {
                // The semaphore is never closed, so acquire only fails if it is dropped.
                let _permit = semaphore.acquire_owned().await.ok();
                let size = batch.len();
                let result = classify_with_timeout(classifier.as_ref(), &batch, timeout_ms).await;
                (size, result)
            }));
        }

        for i in 0..handles.len() {
            let outcome = match (&mut handles[i]).await {
                Ok((size, result)) => merger.apply(i + 1, size, result),
                Err(e) => Err(IndexError::TaskFailed {
                    batch: i + 1,
                    message: e.to_string(),
                }),
            };
            if let Err(e) = outcome {
                for remaining in &handles[i + 1..] {
                    remaining.abort();
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

/// Classify one batch with a bounded wait, results in batch order.
async fn classify_with_timeout(
    classifier: &dyn Classifier,
    batch: &[ImageRef],
    timeout_ms: u64,
) -> Result<Vec<PerImageLabels>, ClassifyError> {
    match tokio::time::timeout(Duration::from_millis(timeout_ms), classifier.classify(batch)).await
    {
        Ok(result) => result.map(|results| order_by_batch(batch, results)),
        Err(_) => Err(ClassifyError::Timeout { timeout_ms }),
    }
}

/// Single writer for the builder; applies batch results in order.
struct Merger<F> {
    builder: TagIndexBuilder,
    stats: IndexStats,
    total: usize,
    policy: FailurePolicy,
    on_batch: F,
}

impl<F: FnMut(&BatchEvent)> Merger<F> {
    fn apply(
        &mut self,
        batch: usize,
        size: usize,
        result: Result<Vec<PerImageLabels>, ClassifyError>,
    ) -> Result<(), IndexError> {
        let outcome = match result {
            Ok(labels) => {
                let hits = self.builder.merge(&labels);
                self.stats.images_indexed += labels.len();
                tracing::debug!(
                    "Stored {} labels for {} images from batch {}",
                    hits,
                    labels.len(),
                    batch
                );
                BatchOutcome::Indexed {
                    images: labels.len(),
                    hits,
                }
            }
            Err(e) => {
                self.stats.batches_failed += 1;
                if self.policy == FailurePolicy::Abort {
                    tracing::error!("Batch {batch}/{} failed, aborting: {e}", self.total);
                    return Err(IndexError::BatchFailed {
                        batch,
                        total: self.total,
                        source: e,
                    });
                }
                tracing::warn!(
                    "Batch {batch}/{} failed, {size} images left unindexed: {e}",
                    self.total
                );
                BatchOutcome::Failed(e.to_string())
            }
        };

        (self.on_batch)(&BatchEvent {
            batch,
            total: self.total,
            size,
            outcome,
        });
        Ok(())
    }
}
