//! Classification of image batches by an external vision-tagging service.
//!
//! [`Classifier`] is the seam the indexing pipeline talks to;
//! [`ClarifaiClassifier`] is the HTTP implementation.

pub(crate) mod clarifai;
pub(crate) mod classifier;

pub use clarifai::ClarifaiClassifier;
pub use classifier::Classifier;

use std::collections::{HashMap, VecDeque};

use crate::types::{ImageRef, PerImageLabels};

/// Reorder `results` to follow `batch`, whatever order the service answered in.
///
/// Results for images not in the batch are dropped. An image submitted twice
/// takes its results in the order they arrived.
pub(crate) fn order_by_batch(
    batch: &[ImageRef],
    results: Vec<PerImageLabels>,
) -> Vec<PerImageLabels> {
    let mut buckets: HashMap<String, VecDeque<PerImageLabels>> = HashMap::new();
    for result in results {
        buckets
            .entry(result.image.clone())
            .or_default()
            .push_back(result);
    }

    batch
        .iter()
        .filter_map(|image| buckets.get_mut(image).and_then(VecDeque::pop_front))
        .collect()
}
