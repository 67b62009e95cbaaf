//! Append-only accumulation of label hits before the final sort.

use std::collections::HashMap;

use super::TagIndex;
use crate::types::{LabelHit, PerImageLabels};

/// Mutable phase of index construction.
#[derive(Debug, Default)]
pub struct TagIndexBuilder {
    entries: HashMap<String, Vec<LabelHit>>,
}

impl TagIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one hit to `label`, creating the entry on first use.
    pub fn insert(&mut self, label: &str, hit: LabelHit) {
        match self.entries.get_mut(label) {
            Some(hits) => hits.push(hit),
            None => {
                self.entries.insert(label.to_string(), vec![hit]);
            }
        }
    }

    /// Merge one classification response, returning how many hits were added.
    pub fn merge(&mut self, results: &[PerImageLabels]) -> usize {
        let mut added = 0;
        for result in results {
            for concept in &result.labels {
                self.insert(
                    &concept.name,
                    LabelHit::new(result.image.clone(), concept.confidence),
                );
                added += 1;
            }
        }
        added
    }

    pub fn label_count(&self) -> usize {
        self.entries.len()
    }

    /// Sort every label's hits by descending confidence and freeze the index.
    ///
    /// The sort is stable, so equal confidences keep insertion order. With
    /// `cap` set, each list is truncated to its best `cap` hits.
    pub fn finish(mut self, cap: Option<usize>) -> TagIndex {
        for hits in self.entries.values_mut() {
            sort_hits(hits);
            if let Some(cap) = cap {
                hits.truncate(cap);
            }
        }
        TagIndex::from_sorted(self.entries)
    }
}

/// Stable descending sort by confidence.
pub(crate) fn sort_hits(hits: &mut [LabelHit]) {
    hits.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Concept;

    #[test]
    fn test_insert_creates_and_appends() {
        let mut builder = TagIndexBuilder::new();
        builder.insert("cat", LabelHit::new("a", 0.5));
        builder.insert("cat", LabelHit::new("b", 0.6));
        builder.insert("dog", LabelHit::new("a", 0.1));
        assert_eq!(builder.label_count(), 2);

        let index = builder.finish(None);
        assert_eq!(index.lookup("cat", 10), vec!["b", "a"]);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut builder = TagIndexBuilder::new();
        for image in ["first", "second", "third"] {
            builder.insert("sky", LabelHit::new(image, 0.8));
        }
        builder.insert("sky", LabelHit::new("best", 0.95));

        let index = builder.finish(None);
        assert_eq!(
            index.lookup("sky", 10),
            vec!["best", "first", "second", "third"]
        );
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut hits = vec![
            LabelHit::new("a", 0.3),
            LabelHit::new("b", 0.9),
            LabelHit::new("c", 0.3),
            LabelHit::new("d", 0.5),
        ];
        sort_hits(&mut hits);
        let once = hits.clone();
        sort_hits(&mut hits);
        assert_eq!(hits, once);
    }

    #[test]
    fn test_merge_counts_every_triple() {
        let mut builder = TagIndexBuilder::new();
        let added = builder.merge(&[
            PerImageLabels {
                image: "a".to_string(),
                labels: vec![Concept::new("cat", 0.9), Concept::new("pet", 0.8)],
            },
            PerImageLabels {
                image: "a".to_string(),
                labels: vec![Concept::new("cat", 0.7)],
            },
        ]);
        assert_eq!(added, 3);

        // Duplicate references are indexed independently
        let index = builder.finish(None);
        assert_eq!(index.lookup("cat", 10), vec!["a", "a"]);
        assert_eq!(index.hit_count(), 3);
    }

    #[test]
    fn test_finish_applies_cap_after_sort() {
        let mut builder = TagIndexBuilder::new();
        builder.insert("cat", LabelHit::new("low", 0.1));
        builder.insert("cat", LabelHit::new("high", 0.9));
        builder.insert("cat", LabelHit::new("mid", 0.5));

        let index = builder.finish(Some(2));
        assert_eq!(index.lookup("cat", 10), vec!["high", "mid"]);
    }
}
