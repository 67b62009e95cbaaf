//! Core data types shared by the classifier, the index, and the pipeline.

use serde::{Deserialize, Serialize};

/// Opaque reference to an image, usually a URL.
///
/// No uniqueness is enforced: the same reference listed twice is tagged twice.
pub type ImageRef = String;

/// One association between an image and a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelHit {
    /// The image the label was reported for
    pub image: ImageRef,

    /// Service-reported confidence in [0, 1]
    pub confidence: f64,
}

impl LabelHit {
    pub fn new(image: impl Into<ImageRef>, confidence: f64) -> Self {
        Self {
            image: image.into(),
            confidence,
        }
    }
}

/// A concept reported by the classification service for one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    /// The label (e.g., "cat", "outdoors")
    pub name: String,

    /// Confidence score from 0.0 to 1.0
    pub confidence: f64,
}

impl Concept {
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// All concepts the service reported for a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerImageLabels {
    /// Reference echoed back by the service
    pub image: ImageRef,

    /// Reported concepts, in service order
    pub labels: Vec<Concept>,
}

/// Statistics for one indexing run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndexStats {
    /// Number of batches submitted
    pub batches_total: usize,

    /// Batches whose classification failed
    pub batches_failed: usize,

    /// Images handed to the pipeline
    pub images_submitted: usize,

    /// Images that came back with labels and were merged
    pub images_indexed: usize,

    /// Distinct labels in the finished index
    pub labels: usize,

    /// Total label hits in the finished index
    pub hits: usize,

    /// Wall-clock duration of the run in seconds
    pub total_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_image_labels_serde() {
        let labels = PerImageLabels {
            image: "https://example.com/a.jpg".to_string(),
            labels: vec![Concept::new("cat", 0.9), Concept::new("pet", 0.8)],
        };
        let json = serde_json::to_string(&labels).unwrap();
        assert!(json.contains("\"image\":\"https://example.com/a.jpg\""));
        assert!(json.contains("\"name\":\"cat\""));

        let parsed: PerImageLabels = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, labels);
    }

    #[test]
    fn test_index_stats_default_is_zeroed() {
        let stats = IndexStats::default();
        assert_eq!(stats.batches_total, 0);
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.total_seconds, 0.0);
    }
}
